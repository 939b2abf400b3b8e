pub mod account;
pub mod cookies;
pub mod gate;
pub mod handlers;
pub mod session;
pub mod storage;

pub use gate::{gate, GateOutcome, SignInPrompt};
pub use session::{AuthContext, Persistence, SessionStore};
