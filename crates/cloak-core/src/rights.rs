//! Canonical usage-right names.
//!
//! These strings are what license payloads and access checks traffic in;
//! the casing is part of the wire contract and must not change.

pub const OWNER: &str = "OWNER";
pub const VIEW: &str = "VIEW";
pub const VIEW_RIGHTS_DATA: &str = "VIEWRIGHTSDATA";
pub const EDIT: &str = "EDIT";
pub const DOC_EDIT: &str = "DOCEDIT";
pub const EXPORT: &str = "EXPORT";
pub const EXTRACT: &str = "EXTRACT";
pub const PRINT: &str = "PRINT";
pub const COMMENT: &str = "COMMENT";
pub const REPLY: &str = "REPLY";
pub const REPLY_ALL: &str = "REPLYALL";
pub const FORWARD: &str = "FORWARD";
pub const OBJ_MODEL: &str = "OBJMODEL";

/// Every right the SDK knows about.
pub fn all() -> &'static [&'static str] {
    &[
        OWNER,
        VIEW,
        VIEW_RIGHTS_DATA,
        EDIT,
        DOC_EDIT,
        EXPORT,
        EXTRACT,
        PRINT,
        COMMENT,
        REPLY,
        REPLY_ALL,
        FORWARD,
        OBJ_MODEL,
    ]
}

/// Default rights granted to recipients of a do-not-forward message:
/// they can read and respond but not redistribute the content.
pub fn do_not_forward_defaults() -> Vec<String> {
    [VIEW, VIEW_RIGHTS_DATA, DOC_EDIT, EDIT, REPLY, REPLY_ALL, OBJ_MODEL]
        .iter()
        .map(|r| (*r).to_owned())
        .collect()
}

/// Default rights granted to recipients of encrypt-only content:
/// everything except ownership and export.
pub fn encrypt_only_defaults() -> Vec<String> {
    [
        VIEW,
        VIEW_RIGHTS_DATA,
        DOC_EDIT,
        EDIT,
        PRINT,
        COMMENT,
        REPLY,
        REPLY_ALL,
        FORWARD,
        EXTRACT,
        OBJ_MODEL,
    ]
    .iter()
    .map(|r| (*r).to_owned())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sets_never_grant_ownership() {
        assert!(!do_not_forward_defaults().iter().any(|r| r == OWNER));
        assert!(!encrypt_only_defaults().iter().any(|r| r == OWNER));
        assert!(!encrypt_only_defaults().iter().any(|r| r == EXPORT));
    }

    #[test]
    fn do_not_forward_blocks_redistribution() {
        let rights = do_not_forward_defaults();
        assert!(!rights.iter().any(|r| r == FORWARD));
        assert!(!rights.iter().any(|r| r == EXTRACT));
        assert!(rights.iter().any(|r| r == REPLY));
    }
}
