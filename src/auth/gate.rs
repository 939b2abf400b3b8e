use crate::auth::session::AuthContext;

/// Prompt shown in place of an auth-gated navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInPrompt {
    pub title: &'static str,
    pub description: &'static str,
    pub signup_href: &'static str,
    pub signin_href: &'static str,
}

impl Default for SignInPrompt {
    fn default() -> Self {
        Self {
            title: "Create an account first",
            description:
                "You need to sign in or create an account before you can write a story.",
            signup_href: "/signup",
            signin_href: "/signin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Navigate(&'static str),
    Prompt(SignInPrompt),
}

/// Branch an auth-gated action on whether the context is signed in.
pub fn gate(ctx: &AuthContext, target: &'static str) -> GateOutcome {
    if ctx.is_authenticated() {
        GateOutcome::Navigate(target)
    } else {
        GateOutcome::Prompt(SignInPrompt::default())
    }
}
