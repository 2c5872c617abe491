// Handlers for CLI subcommands
//
// main.rs parses arguments and dispatches to one handler per subcommand.

pub mod check;
pub mod densify;
pub mod score;
