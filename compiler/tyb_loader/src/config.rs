/// Loader settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Package-name prefixes mapped to a fixed module name. Packages matching
    /// no prefix get a module named after the package itself.
    pub platform_modules: Vec<(String, String)>,
    /// Skip non-public members of classes in these package prefixes.
    pub public_only_prefixes: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            platform_modules: [("java.", "java"), ("javax.", "javax"), ("sun.", "sun"), ("lang.", "lang")]
                .into_iter()
                .map(|(prefix, module)| (prefix.to_owned(), module.to_owned()))
                .collect(),
            public_only_prefixes: vec!["java.".to_owned()],
        }
    }
}

impl LoaderConfig {
    /// Module a package belongs to.
    pub fn module_for_package<'p>(&'p self, package: &'p str) -> &'p str {
        self.platform_modules
            .iter()
            .find(|(prefix, _)| package.starts_with(prefix.as_str()))
            .map_or(package, |(_, module)| module.as_str())
    }

    pub fn public_only(&self, package: &str) -> bool {
        self.public_only_prefixes
            .iter()
            .any(|prefix| package.starts_with(prefix.as_str()))
    }
}
