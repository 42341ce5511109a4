//! Screen routes.
//!
//! Services never navigate. Session and checkout operations return the
//! route the caller should show next.

/// A screen in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    VerifyOtp,
    Home,
    Menu,
    Stores,
    Orders,
    Profile,
    /// Return to the previous screen.
    Back,
}

impl Route {
    /// Path as used by the screen router.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::VerifyOtp => "/verify-otp",
            Self::Home => "/home",
            Self::Menu => "/menu",
            Self::Stores => "/stores",
            Self::Orders => "/orders",
            Self::Profile => "/profile",
            Self::Back => "..",
        }
    }

    /// Screens reachable without signing in.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::VerifyOtp)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
