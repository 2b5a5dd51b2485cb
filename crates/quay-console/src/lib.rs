//! Console composition: handler routing and the input session contract.
//!
//! A [`ConsoleRouter`] splits one input stream between handlers keyed by a
//! leading prefix character, falling back to a default handler. The
//! [`Console`] wires a router, a command handler, a message log and a task
//! queue together from a [`ConsoleConfig`](quay_types::ConsoleConfig); an
//! [`InputSession`] drives it from text-field events.

pub mod console;
pub mod handler;
pub mod router;
pub mod session;

pub use console::Console;
pub use handler::{CommandHandler, Handler, MessageHandler};
pub use router::ConsoleRouter;
pub use session::InputSession;
