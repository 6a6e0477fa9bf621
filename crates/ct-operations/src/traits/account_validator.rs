use crate::Result;

pub trait AccountValidator: Send + Sync {
    /// Confirms that `account` exists on the hosting `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, the domain is not
    /// supported, or the lookup fails.
    fn validate(&self, domain: &str, account: &str) -> Result<()>;
}
