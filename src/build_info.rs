mod raw {
    // The full list of constants generated by `built` can be found at https://docs.rs/built/latest/built/index.html
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// The crate version, such as 0.1.0
pub const CMSMARK_PKG_VERSION: &str = raw::PKG_VERSION;

/// Comma separated features enabled for this build
pub const CMSMARK_FEATURES: &str = raw::FEATURES_STR;

lazy_static! {
    /// Git version such as a96e8f991c91a81df51e7975849441f52fdbcdcc, or a96e8f991c91a81df51e7975849441f52fdbcdcc-dirty,
    /// or unknown-git-version if the crate is not built from a git repo.
    pub static ref CMSMARK_GIT_VERSION: &'static str = &CMSMARK_GIT_VERSION_STRING;

    // Owned string
    static ref CMSMARK_GIT_VERSION_STRING: String = match (raw::GIT_COMMIT_HASH, raw::GIT_DIRTY) {
        (Some(hash), dirty) => format!("{}{}", hash, if dirty == Some(true) { "-dirty" } else { "" }),
        (None, _) => "unknown-git-version".to_string(),
    };

    /// Full build info, including the crate version, git version, and enabled features
    pub static ref CMSMARK_FULL_BUILD_INFO: String = format!(
        "cmsmark {} ({}, features: {})",
        CMSMARK_PKG_VERSION, *CMSMARK_GIT_VERSION, CMSMARK_FEATURES
    );
}
