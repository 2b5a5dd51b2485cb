//! Sample commands for the demo host.

use std::time::Duration;

use quay_command::{ActionTable, Dispatcher};
use quay_registry::{RegistryParser, SharedRegistry};
use quay_types::error::Result;

use crate::content::{Content, Item};

quay_command::command_set! {
    /// Arithmetic and timing commands.
    pub struct Basics;

    /// Add two integers
    fn add(inv, a: i32, b: i32 = 0) {
        inv.message(&format!("{a} + {b} is {}", a + b));
    }

    /// Reply after a delay
    fn wait(inv, seconds: f32 = 1.0) {
        if !(0.0..=3600.0).contains(&seconds) {
            inv.error("seconds must be between 0 and 3600");
            return Ok(());
        }
        inv.message(&format!("Waiting {seconds:.2}s"));
        inv.defer(Duration::from_secs_f32(seconds), move |sink| {
            sink.add_message(&format!("Waited for {seconds:.2}s"));
        });
    }

    /// Cancel the most recent pending wait
    #[command = "cancel"]
    fn cancel_last(inv) {
        match inv.tasks().last_id() {
            Some(id) => {
                inv.tasks().cancel(id)?;
                inv.message("Canceled");
            },
            None => inv.warning("nothing to cancel"),
        }
    }
}

quay_command::command_set! {
    /// Commands over the item registry.
    pub struct Inventory;

    /// Describe an item
    fn give(inv, item: Item, count: u32 = 1) {
        let total = item.value.saturating_mul(count);
        inv.message(&format!("{count} x {} ({total} total)", item.name));
        if !item.description.is_empty() {
            inv.message(&format!("  {}", item.description));
        }
    }
}

/// Actions that record commands can bind to.
pub fn actions() -> Result<ActionTable> {
    let mut actions = ActionTable::new();
    actions.insert("echo", |inv| {
        let text: String = inv.next_arg()?;
        inv.message(&text);
        Ok(())
    })?;
    actions.insert("upper", |inv| {
        let text: String = inv.next_arg()?;
        inv.message(&text.to_uppercase());
        Ok(())
    })?;
    actions.insert("greet", |inv| {
        let who: String = inv.next_arg()?;
        inv.message(&format!("Hello, {who}!"));
        Ok(())
    })?;
    Ok(actions)
}

/// Build the demo command table.
pub fn dispatcher(content: &Content) -> Result<Dispatcher> {
    let items: SharedRegistry<String, Item> = content.items()?.freeze();
    let mut d = Dispatcher::new();
    d.parsers_mut().register_parser(RegistryParser::new(items));
    d.parsers_mut().alias::<Item>("item");

    d.register_set::<Basics>()?;
    d.register_set::<Inventory>()?;

    if content.has("commands") {
        let records = content.commands()?;
        let n = d.register_records(&records, &actions()?)?;
        log::info!("Registered {n} record commands");
    }
    Ok(d)
}
