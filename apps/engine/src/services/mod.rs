//! Orchestration services: validate a request, build a transaction,
//! execute it atomically through the session's manager.

pub mod cards;
pub mod games;
pub mod projects;
pub mod turns;
pub mod validation;

pub use cards::CardService;
pub use games::GameService;
pub use projects::StandardProjectService;
pub use turns::TurnFlowService;
pub use validation::ActionValidator;
