//! End-to-end purchase scenarios against the stock terminal.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use ticket_terminal::clock::ManualClock;
use ticket_terminal::config::{ConfigError, ConfigIssue, TerminalConfig};
use ticket_terminal::policy::PolicyBuilder;
use ticket_terminal::{
    Intent, MachineState, Money, Rejection, Terminal, TerminalBuilder, TerminalStatus,
    TicketClass,
};

fn terminal() -> Terminal {
    TerminalBuilder::with_defaults().build().unwrap()
}

fn major(units: i64) -> Money {
    Money::from_major(units)
}

#[test]
fn adult_ticket_with_exact_payment() {
    let mut terminal = terminal();

    let selected = terminal.select_ticket(TicketClass::Adult, "Center").unwrap();
    assert_eq!(selected.price, major(100));
    assert_eq!(terminal.state(), MachineState::WaitingForMoney);

    assert_eq!(terminal.insert_money(major(50)).unwrap(), major(50));
    assert_eq!(terminal.state(), MachineState::PartialMoneyReceived);
    assert_eq!(terminal.status().amount_due, major(50));

    assert_eq!(terminal.insert_money(major(50)).unwrap(), major(100));
    assert_eq!(terminal.state(), MachineState::MoneyReceived);

    let ticket = terminal.dispense_ticket().unwrap();
    assert_eq!(ticket.number, selected.number);
    assert_eq!(ticket.class, TicketClass::Adult);
    assert_eq!(terminal.state(), MachineState::TicketDispensed);

    let status = terminal.status();
    assert_eq!(status.inventory_count, 49);
    assert_eq!(status.inventory[&TicketClass::Adult], 9);
    assert_eq!(status.inserted_amount, major(100));
    assert_eq!(status.change_due, Money::ZERO);

    // Exact payment: asking for change ends the sale.
    assert_eq!(terminal.dispense_change(), Err(Rejection::NoChangeOwed));
    assert_eq!(terminal.state(), MachineState::Idle);
    assert_eq!(terminal.status().inserted_amount, Money::ZERO);
}

#[test]
fn vip_ticket_with_overpayment() {
    let mut terminal = terminal();

    terminal.select_ticket(TicketClass::Vip, "Stadium").unwrap();
    terminal.insert_money(major(250)).unwrap();
    assert_eq!(terminal.state(), MachineState::MoneyReceived);
    assert_eq!(terminal.status().change_due, major(50));

    terminal.dispense_ticket().unwrap();
    assert_eq!(terminal.dispense_change().unwrap(), major(50));
    assert_eq!(terminal.state(), MachineState::ChangeDispensed);

    let status = terminal.status();
    assert_eq!(status.available_change, major(450));
    assert_eq!(status.inventory[&TicketClass::Vip], 9);

    assert_eq!(terminal.dispense_change(), Err(Rejection::NoChangeOwed));
    assert_eq!(terminal.cancel_transaction(), Err(Rejection::TransactionCompleted));
    assert_eq!(terminal.dispense_ticket().unwrap_err(), Rejection::TicketAlreadyIssued);
}

#[test]
fn change_before_ticket_then_ticket() {
    let mut terminal = terminal();
    terminal.select_ticket(TicketClass::Child, "Theater").unwrap();
    terminal.insert_money(major(60)).unwrap();

    assert_eq!(terminal.dispense_change().unwrap(), major(10));
    assert_eq!(terminal.state(), MachineState::ChangeDispensed);
    assert_eq!(
        terminal.select_ticket(TicketClass::Adult, "Center"),
        Err(Rejection::SaleInProgress)
    );

    terminal.dispense_ticket().unwrap();
    assert_eq!(terminal.state(), MachineState::TicketDispensed);
    assert_eq!(terminal.status().change_due, Money::ZERO);
}

#[test]
fn cancel_after_change_refunds_the_rest() {
    let mut terminal = terminal();
    terminal.select_ticket(TicketClass::Senior, "Airport").unwrap();
    terminal.insert_money(major(100)).unwrap();
    terminal.dispense_change().unwrap();

    assert_eq!(terminal.cancel_transaction().unwrap(), major(80));
    assert_eq!(terminal.state(), MachineState::Idle);
    assert_eq!(terminal.status().available_change, major(480));
}

#[test]
fn canceled_purchase_refunds_everything() {
    let mut terminal = terminal();
    terminal.select_ticket(TicketClass::Student, "Station").unwrap();
    terminal.insert_money(major(30)).unwrap();

    assert_eq!(terminal.cancel_transaction().unwrap(), major(30));
    let status = terminal.status();
    assert_eq!(status.state, MachineState::Idle);
    assert_eq!(status.inserted_amount, Money::ZERO);
    assert!(status.selected_ticket.is_none());
    assert_eq!(status.inventory_count, 50);
}

#[test]
fn exhausted_class_enters_error_and_refunds() {
    let mut terminal = TerminalBuilder::with_defaults()
        .stock(TicketClass::Child, 0)
        .build()
        .unwrap();

    terminal.select_ticket(TicketClass::Child, "Center").unwrap();
    terminal.insert_money(major(50)).unwrap();

    assert_eq!(
        terminal.dispense_ticket(),
        Err(Rejection::InsufficientInventory {
            class: TicketClass::Child
        })
    );
    assert_eq!(terminal.state(), MachineState::Error);
    assert_eq!(terminal.status().inventory[&TicketClass::Child], 0);

    assert!(terminal.can(Intent::ProcessRefund));
    assert!(!terminal.can(Intent::SelectTicket));
    assert_eq!(terminal.process_refund().unwrap(), major(50));
    assert_eq!(terminal.state(), MachineState::Idle);
}

#[test]
fn short_change_pool_enters_error_without_paying() {
    let mut terminal = TerminalBuilder::with_defaults()
        .available_change(major(20))
        .build()
        .unwrap();

    terminal.select_ticket(TicketClass::Vip, "Stadium").unwrap();
    terminal.insert_money(major(300)).unwrap();
    terminal.dispense_ticket().unwrap();

    assert_eq!(
        terminal.dispense_change(),
        Err(Rejection::InsufficientChange {
            owed: major(100),
            available: major(20)
        })
    );
    assert_eq!(terminal.state(), MachineState::Error);
    assert_eq!(terminal.status().available_change, major(20));

    // The ticket is out, so there is nothing to refund.
    assert_eq!(terminal.process_refund(), Err(Rejection::RefundUnavailable));
    terminal.reset_transaction();
    assert_eq!(terminal.state(), MachineState::Idle);
}

#[test]
fn short_change_before_ticket_refunds_full_insertion() {
    let mut terminal = TerminalBuilder::with_defaults()
        .available_change(major(20))
        .build()
        .unwrap();

    terminal.select_ticket(TicketClass::Vip, "Stadium").unwrap();
    terminal.insert_money(major(300)).unwrap();
    assert_eq!(terminal.state(), MachineState::MoneyReceived);

    assert_eq!(
        terminal.dispense_change(),
        Err(Rejection::InsufficientChange {
            owed: major(100),
            available: major(20)
        })
    );
    assert_eq!(terminal.state(), MachineState::Error);
    assert!(terminal.status().issued_ticket.is_none());

    assert_eq!(terminal.process_refund().unwrap(), major(300));
    let status = terminal.status();
    assert_eq!(status.state, MachineState::Idle);
    assert_eq!(status.inserted_amount, Money::ZERO);
    assert_eq!(status.available_change, major(20));
    assert_eq!(status.inventory[&TicketClass::Vip], 10);
}

#[test]
fn reselect_is_refused_while_change_is_owed() {
    let mut terminal = terminal();
    terminal.select_ticket(TicketClass::Vip, "Stadium").unwrap();
    terminal.insert_money(major(250)).unwrap();
    terminal.dispense_ticket().unwrap();
    let history_before = terminal.history().len();

    assert_eq!(
        terminal.select_ticket(TicketClass::Adult, "Center"),
        Err(Rejection::ChangeOwed { owed: major(50) })
    );
    let status = terminal.status();
    assert_eq!(status.state, MachineState::TicketDispensed);
    assert_eq!(status.change_due, major(50));
    assert_eq!(status.available_change, major(500));
    assert_eq!(terminal.history().len(), history_before);

    assert_eq!(terminal.dispense_change().unwrap(), major(50));
    terminal.select_ticket(TicketClass::Adult, "Center").unwrap();
    assert_eq!(terminal.state(), MachineState::WaitingForMoney);
    assert_eq!(terminal.status().available_change, major(450));
}

#[test]
fn reselect_after_dispense_is_one_operation() {
    let mut terminal = terminal();
    terminal.select_ticket(TicketClass::Adult, "Center").unwrap();
    terminal.insert_money(major(100)).unwrap();
    terminal.dispense_ticket().unwrap();
    let history_before = terminal.history().len();

    assert!(matches!(
        terminal.select_ticket(TicketClass::Adult, "Atlantis"),
        Err(Rejection::UnknownTicket { .. })
    ));
    assert_eq!(terminal.state(), MachineState::TicketDispensed);
    assert!(terminal.status().issued_ticket.is_some());

    let next = terminal.select_ticket(TicketClass::Child, "Airport").unwrap();
    assert_eq!(next.price, major(50));
    assert_eq!(terminal.state(), MachineState::WaitingForMoney);
    assert_eq!(terminal.status().inserted_amount, Money::ZERO);

    let moves: Vec<_> = terminal
        .history()
        .transitions()
        .skip(history_before)
        .map(|t| (t.from, t.to))
        .collect();
    assert_eq!(
        moves,
        vec![
            (MachineState::TicketDispensed, MachineState::Idle),
            (MachineState::Idle, MachineState::WaitingForMoney),
        ]
    );
}

#[test]
fn wrong_state_operations_are_rejected_by_reason() {
    let mut terminal = terminal();

    let err = terminal.dispense_ticket().unwrap_err();
    assert_eq!(
        err.reason(),
        "Cannot dispense a ticket while the terminal is in state Idle"
    );
    assert!(terminal.insert_money(major(0)).unwrap_err().is_wrong_state());

    terminal.select_ticket(TicketClass::Adult, "Center").unwrap();
    assert_eq!(
        terminal.insert_money(Money::ZERO),
        Err(Rejection::InvalidAmount { amount: Money::ZERO })
    );
    assert_eq!(terminal.state(), MachineState::WaitingForMoney);
}

#[test]
fn maintenance_restocks_and_refills() {
    let mut terminal = terminal();
    terminal.enter_maintenance().unwrap();
    assert_eq!(terminal.state(), MachineState::MaintenanceMode);

    assert!(terminal
        .select_ticket(TicketClass::Adult, "Center")
        .unwrap_err()
        .is_wrong_state());
    assert_eq!(terminal.restock(TicketClass::Vip, 5).unwrap(), 15);
    assert_eq!(terminal.replenish_change(major(100)).unwrap(), major(600));
    assert!(matches!(
        terminal.replenish_change(Money::ZERO),
        Err(Rejection::InvalidAmount { .. })
    ));

    terminal.exit_maintenance().unwrap();
    let status = terminal.status();
    assert_eq!(status.state, MachineState::Idle);
    assert_eq!(status.inventory_count, 55);
    assert_eq!(status.available_change, major(600));
}

#[test]
fn idle_sale_is_expired_by_the_timer() {
    let clock = Arc::new(ManualClock::default());
    let mut terminal = TerminalBuilder::with_defaults()
        .policy(PolicyBuilder::new().idle_timeout(Duration::from_secs(120)).build())
        .clock(clock.clone())
        .build()
        .unwrap();

    terminal.select_ticket(TicketClass::Vip, "Theater").unwrap();
    terminal.insert_money(major(200)).unwrap();
    assert_eq!(terminal.state(), MachineState::MoneyReceived);

    clock.advance(chrono::Duration::minutes(3));
    let now = ticket_terminal::clock::Clock::now(clock.as_ref());
    assert_eq!(terminal.expire_idle_transaction(now), Some(major(200)));
    assert_eq!(terminal.state(), MachineState::Idle);
    assert_eq!(terminal.history().last().unwrap().cause, Intent::ExpireIdle);
}

#[test]
fn status_serializes_to_json() {
    let mut terminal = terminal();
    terminal.select_ticket(TicketClass::Senior, "Station").unwrap();
    terminal.insert_money("12.50".parse().unwrap()).unwrap();

    let status = terminal.status();
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["state"], "PartialMoneyReceived");
    assert_eq!(json["inserted_amount"], "12.50");
    assert_eq!(json["amount_due"], "67.50");
    assert_eq!(json["inventory"]["senior"], 10);

    let back: TerminalStatus = serde_json::from_value(json).unwrap();
    assert_eq!(back, status);
}

#[test]
fn terminal_builds_from_config_file() {
    let path = std::env::temp_dir().join(format!("ticket-terminal-{}.yaml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "prices:\n  adult: 2.5\n  child: 1\ndestinations: [Harbour, Old Town]\ninventory:\n  adult: 3\navailable_change: 10"
    )
    .unwrap();

    let config = TerminalConfig::load_from(Some(&path)).unwrap();
    std::fs::remove_file(&path).ok();

    let mut terminal = TerminalBuilder::from_config(config).build().unwrap();
    let ticket = terminal.select_ticket(TicketClass::Adult, "Old Town").unwrap();
    assert_eq!(ticket.price, "2.50".parse().unwrap());
    assert_eq!(
        terminal.status().inventory,
        BTreeMap::from([
            (TicketClass::Adult, 3),
            (TicketClass::Child, 0),
            (TicketClass::Student, 0),
            (TicketClass::Senior, 0),
            (TicketClass::Vip, 0),
        ])
    );
}

#[test]
fn config_errors_are_accumulated() {
    let err = TerminalConfig::from_yaml_str(
        "prices:\n  adult: 0\ndestinations: [' ']\nticket_validity_minutes: 0\n",
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
    assert_eq!(
        err.issues(),
        &[
            ConfigIssue::NonPositivePrice {
                class: TicketClass::Adult,
                price: Money::ZERO
            },
            ConfigIssue::BlankDestination { index: 0 },
            ConfigIssue::ZeroValidity,
        ]
    );
}
