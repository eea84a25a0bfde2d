//! Ticket Vending Scenarios
//!
//! Walks a stock terminal through four customer and operator sessions and
//! prints the status panel after every step.
//!
//! Key concepts:
//! - Guards refuse operations without side effects
//! - Cancel and refund chain through pass-through states
//! - Overpayment is returned from the change pool
//! - Maintenance mode for restocking
//!
//! Run with: cargo run --example vending_scenarios
//! Set TICKET_TERMINAL_LOG=debug to see every state transition.

use ticket_terminal::logging::init_logging;
use ticket_terminal::{Money, Terminal, TerminalBuilder, TerminalResult, TicketClass};

fn report<T: std::fmt::Debug>(step: &str, result: TerminalResult<T>, terminal: &Terminal) {
    println!("\n{step}");
    match result {
        Ok(value) => println!("  -> ok: {value:?}"),
        Err(rejection) => println!("  -> refused: {rejection}"),
    }
    println!("{}", terminal.status());
}

fn main() {
    init_logging();

    println!("=== Ticket Vending Terminal ===\n");
    let mut terminal = match TerminalBuilder::with_defaults().build() {
        Ok(terminal) => terminal,
        Err(err) => {
            eprintln!("cannot build terminal: {err}");
            return;
        }
    };
    println!("{}", terminal.status());

    println!("\n=== Scenario 1: successful purchase ===");
    let r = terminal.select_ticket(TicketClass::Adult, "Center");
    report("1. Select ticket", r, &terminal);
    let r = terminal.insert_money(Money::from_major(50));
    report("2. Insert part of the price", r, &terminal);
    let r = terminal.insert_money(Money::from_major(50));
    report("3. Insert the rest", r, &terminal);
    let r = terminal.dispense_ticket();
    report("4. Dispense ticket", r, &terminal);
    let r = terminal.dispense_change();
    report("5. Dispense change (if any)", r, &terminal);

    println!("\n=== Scenario 2: canceled purchase ===");
    terminal.reset_transaction();
    let r = terminal.select_ticket(TicketClass::Child, "Airport");
    report("1. Select ticket", r, &terminal);
    let r = terminal.insert_money(Money::from_major(30));
    report("2. Insert part of the price", r, &terminal);
    let r = terminal.cancel_transaction();
    report("3. Cancel", r, &terminal);

    println!("\n=== Scenario 3: overpayment ===");
    terminal.reset_transaction();
    let r = terminal.select_ticket(TicketClass::Vip, "Stadium");
    report("1. Select VIP ticket", r, &terminal);
    let r = terminal.insert_money(Money::from_major(250));
    report("2. Insert more than the price", r, &terminal);
    let r = terminal.dispense_ticket();
    report("3. Dispense ticket", r, &terminal);
    let r = terminal.dispense_change();
    report("4. Dispense change", r, &terminal);

    println!("\n=== Scenario 4: maintenance ===");
    terminal.reset_transaction();
    let r = terminal.enter_maintenance();
    report("1. Enter maintenance mode", r, &terminal);
    let r = terminal.select_ticket(TicketClass::Adult, "Center");
    report("2. Try to sell while in maintenance", r, &terminal);
    let r = terminal.restock(TicketClass::Vip, 1);
    report("3. Restock VIP tickets", r, &terminal);
    let r = terminal.replenish_change(Money::from_major(50));
    report("4. Refill change pool", r, &terminal);
    let r = terminal.exit_maintenance();
    report("5. Exit maintenance mode", r, &terminal);

    println!("\nPath taken:");
    let path: Vec<String> = terminal
        .history()
        .get_path()
        .iter()
        .map(|s| s.to_string())
        .collect();
    println!("  {}", path.join(" -> "));
}
