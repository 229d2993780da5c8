use std::ffi::OsString;
use std::path::Path;

use super::VcsBackend;

/// `bzr checkout --lightweight`, used by older Launchpad-hosted branches
pub struct BzrBackend;

impl VcsBackend for BzrBackend {
    fn program(&self) -> &'static str {
        "bzr"
    }

    // Launchpad locators like `lp:~user/charm-helpers/devel` carry no ref suffix
    fn checkout_args(&self, locator: &str, dest: &Path) -> Vec<OsString> {
        vec![
            "checkout".into(),
            "--lightweight".into(),
            locator.into(),
            dest.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_args_keep_locator_whole() {
        let args = BzrBackend.checkout_args("lp:~user/charm-helpers@x", Path::new("co"));
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["checkout", "--lightweight", "lp:~user/charm-helpers@x", "co"]);
    }
}
