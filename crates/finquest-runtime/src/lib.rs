//! Runtime for finquest
//!
//! Binds the reasoning producer, the action parser, the tool dispatcher and
//! the conversation transcript into a bounded reason/act loop:
//!
//! 1. The producer is called with the full transcript
//! 2. The new turn is checked for the `Final Answer:` sentinel
//! 3. Otherwise one action is parsed and dispatched
//! 4. The observation is appended and the loop continues
//!
//! Recoverable failures (unparseable actions, unknown tools, capability
//! errors) are appended as error observations; iteration and wall-clock
//! budgets end the session with a distinct [`SessionOutcome`]; only
//! reasoning-producer failures abort with an error.

pub mod agent;
pub mod executor;
pub mod parser;
pub mod prompt;
pub mod termination;
pub mod transcript;

pub use agent::ReactAgent;
pub use executor::{
    ExecutorConfig, ReactExecutor, ReactExecutorBuilder, RuntimeError, RuntimeResult,
    SessionOutcome,
};
pub use parser::{ActionRequest, ParseError, parse_action};
pub use prompt::build_system_prompt;
pub use termination::{FINAL_ANSWER_SENTINEL, final_answer, is_terminal};
pub use transcript::Transcript;
