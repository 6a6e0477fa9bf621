use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::Result;
use crate::error::OperationError;
use crate::traits::AccountValidator;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Forge {
    GitHub,
    GitLab,
    Bitbucket,
}

impl Forge {
    fn from_domain(domain: &str) -> Option<Self> {
        match domain {
            "github.com" => Some(Self::GitHub),
            "gitlab.com" => Some(Self::GitLab),
            "bitbucket.org" => Some(Self::Bitbucket),
            _ => None,
        }
    }

    fn profile_url(self, account: &str) -> String {
        match self {
            Self::GitHub => format!("https://github.com/{account}"),
            Self::GitLab => format!("https://gitlab.com/{account}"),
            Self::Bitbucket => format!("https://bitbucket.org/{account}"),
        }
    }
}

/// Extracts the host of a git remote URL.
///
/// Both URL forms (`https://github.com/org/repo.git`,
/// `ssh://git@github.com/org/repo`) and scp-like forms
/// (`git@github.com:org/repo.git`) are understood.
///
/// # Errors
///
/// Returns [`OperationError::InvalidRemoteUrl`] if no host can be found.
pub fn hosting_domain(remote_url: &str) -> Result<String> {
    let invalid = || OperationError::InvalidRemoteUrl {
        url: remote_url.to_string(),
    };

    if let Ok(url) = Url::parse(remote_url) {
        return url.host_str().map(str::to_lowercase).ok_or_else(invalid);
    }

    remote_url
        .split_once(':')
        .map(|(user_host, _)| user_host)
        .map(|user_host| user_host.rsplit_once('@').map_or(user_host, |(_, host)| host))
        .filter(|host| !host.is_empty() && !host.contains('/'))
        .map(str::to_lowercase)
        .ok_or_else(invalid)
}

/// [`AccountValidator`] that probes the account's public profile page.
pub struct HttpAccountValidator {
    client: reqwest::blocking::Client,
}

impl HttpAccountValidator {
    /// # Errors
    ///
    /// Returns [`OperationError::HttpClient`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("chart-testing/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(OperationError::HttpClient)?;
        Ok(Self { client })
    }
}

fn profile_url(domain: &str, account: &str) -> Result<String> {
    Forge::from_domain(domain)
        .map(|forge| forge.profile_url(account))
        .ok_or_else(|| OperationError::UnsupportedRepositoryDomain {
            domain: domain.to_string(),
        })
}

impl AccountValidator for HttpAccountValidator {
    fn validate(&self, domain: &str, account: &str) -> Result<()> {
        let url = profile_url(domain, account)?;
        debug!(url = %url, "checking account");

        let response = self
            .client
            .head(&url)
            .send()
            .map_err(|source| OperationError::Http {
                url: url.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(OperationError::UnknownAccount {
                domain: domain.to_string(),
                account: account.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_remote() -> anyhow::Result<()> {
        assert_eq!(
            hosting_domain("https://github.com/helm/charts.git")?,
            "github.com"
        );
        Ok(())
    }

    #[test]
    fn ssh_url_remote() -> anyhow::Result<()> {
        assert_eq!(
            hosting_domain("ssh://git@GitLab.com/group/charts")?,
            "gitlab.com"
        );
        Ok(())
    }

    #[test]
    fn scp_like_remote() -> anyhow::Result<()> {
        assert_eq!(
            hosting_domain("git@bitbucket.org:team/charts.git")?,
            "bitbucket.org"
        );
        Ok(())
    }

    #[test]
    fn local_path_remote_is_invalid() {
        assert!(matches!(
            hosting_domain("/srv/git/charts.git"),
            Err(OperationError::InvalidRemoteUrl { .. })
        ));
    }

    #[test]
    fn file_url_remote_is_invalid() {
        assert!(matches!(
            hosting_domain("file:///srv/git/charts.git"),
            Err(OperationError::InvalidRemoteUrl { .. })
        ));
    }

    #[test]
    fn profile_urls_per_forge() -> anyhow::Result<()> {
        assert_eq!(profile_url("github.com", "octocat")?, "https://github.com/octocat");
        assert_eq!(profile_url("gitlab.com", "alice")?, "https://gitlab.com/alice");
        assert_eq!(profile_url("bitbucket.org", "bob")?, "https://bitbucket.org/bob");
        Ok(())
    }

    #[test]
    fn self_hosted_domain_is_unsupported() {
        assert!(matches!(
            profile_url("git.example.com", "alice"),
            Err(OperationError::UnsupportedRepositoryDomain { domain }) if domain == "git.example.com"
        ));
    }
}
