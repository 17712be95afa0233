//! Navigation shown once the credential change completes.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub text: String,
    pub link: String,
}

pub const POST_SIGNIN_LABELS: &[&str] = &["Invoices", "Teaching reports", "Account settings"];
pub const POST_SIGNIN_URLS: &[&str] = &["/invoice", "/teachingReport", "/settings"];

/// Pair `labels` with `urls` by position.
pub fn link_list(labels: &[&str], urls: &[&str]) -> Vec<NavLink> {
    debug_assert_eq!(
        labels.len(),
        urls.len(),
        "every link needs exactly one label"
    );
    labels
        .iter()
        .zip(urls)
        .map(|(text, link)| NavLink {
            text: (*text).to_owned(),
            link: (*link).to_owned(),
        })
        .collect()
}
