use crate::Rejection;

/// Allow-list of policy types (`Ingress`, `Egress`).
///
/// Unset means any type is allowed, while an empty list allows none.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct PolicyTypeValidator(Option<Vec<String>>);

impl PolicyTypeValidator {
    pub fn allow<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Some(types.into_iter().map(Into::into).collect()))
    }

    pub fn is_valid(&self, declared: &[String]) -> Result<(), Rejection> {
        let Some(ref allowed) = self.0 else {
            return Ok(());
        };
        match declared.iter().find(|t| !allowed.contains(t)) {
            None => Ok(()),
            Some(t) => Err(Rejection::PolicyType(t.clone())),
        }
    }
}
