//! Execution of Epinio operations.
//!
//! - [`command`]: typed operations and their command lines
//! - [`process`]: process spawning and failure classification
//! - [`channel`]: named output buffers
//! - [`input`]: operator prompts and their validation
//! - [`resource`]: the resource executor that ties these together

pub mod channel;
pub mod command;
pub mod input;
pub mod process;
pub mod resource;

pub use channel::{DEFAULT_CHANNEL, OutputChannel, OutputChannels};
pub use command::{CommandLine, EpinioCommand, Invocation};
pub use input::{EnvAssignment, InputRequest, PresetInput, Prompter};
pub use process::{CommandExecutor, CommandRunner, ProcessHandle, ProcessOutput};
pub use resource::{EpinioExecutor, OperationContext, SagaStep};
