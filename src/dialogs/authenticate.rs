use super::FormState;

/// Password prompt for running file commands through sudo.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthenticateDialog {
    pub password: String,
    pub form: FormState,
}

impl AuthenticateDialog {
    /// Masked form of the typed password.
    pub fn masked(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    pub fn submit(&mut self) -> String {
        self.form.begin_submit();
        self.password.clone()
    }

    pub fn fail(&mut self, message: String) {
        self.password.clear();
        self.form.fail(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::Phase;

    #[test]
    fn failure_clears_the_password() {
        let mut d = AuthenticateDialog { password: "hunter2".into(), ..Default::default() };
        assert_eq!(d.masked(), "*******");
        assert_eq!(d.submit(), "hunter2");
        d.fail("Sorry, try again.".into());
        assert!(d.password.is_empty());
        assert_eq!(d.form.phase, Phase::Editing);
        assert_eq!(d.form.error.as_deref(), Some("Sorry, try again."));
    }
}
