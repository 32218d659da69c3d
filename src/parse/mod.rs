pub mod shell;
pub mod tokenize;
pub mod types;

pub use shell::{parse, split_segments, strip_heredoc_bodies};
pub use tokenize::{base_command, env_vars, tokenize};
pub use types::{Operator, ParsedPipeline};
