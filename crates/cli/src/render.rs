//! Plain-text rendering of the client's typed results.
//!
//! Screen output goes to stdout, errors and notices to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Display;

use chrono::{DateTime, Local, Utc};
use warung_client::Route;
use warung_client::cart::Cart;
use warung_client::home::HomeFeed;
use warung_client::models::{
    Category, MenuItem, Order, OrderPlacement, PaymentChannel, PaymentStatusReport, Store, User,
    Voucher, WeatherRecommendation,
};

pub fn error(e: &impl Display) {
    eprintln!("Error: {e}");
}

pub fn notice(message: &str) {
    eprintln!("{message}");
}

pub fn heading(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(title.chars().count()));
}

pub fn line(text: &str) {
    println!("{text}");
}

/// Where the app would go next.
pub fn route(route: Route) {
    eprintln!("-> {route}");
}

fn date(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "-".to_string(),
        |at| at.with_timezone(&Local).format("%d %b %Y %H:%M").to_string(),
    )
}

pub fn user(user: &User) {
    println!("{}", user.name);
    println!("  Phone     {}", user.phone);
    println!("  Email     {}", user.email.as_deref().unwrap_or("-"));
    println!(
        "  Verified  {}",
        if user.is_verified { "yes" } else { "no" }
    );
    println!("  Joined    {}", date(user.created_at));
}

pub fn store_row(store: &Store) {
    let state = if store.is_open { "open" } else { "closed" };
    let distance = store
        .distance
        .map(|km| format!("  {km:.1} km"))
        .unwrap_or_default();
    println!("[{}] {} ({state}){distance}", store.id, store.name);
    if !store.address.is_empty() {
        println!("    {}", store.address);
    }
}

pub fn stores(stores: &[Store]) {
    if stores.is_empty() {
        println!("No stores found");
    }
    for store in stores {
        store_row(store);
    }
}

pub fn store_detail(store: &Store) {
    store_row(store);
    if let Some(description) = &store.description {
        println!("    {description}");
    }
    if let Some(hours) = store.hours() {
        println!("    Hours  {hours}");
    }
    if let Some(phone) = &store.phone {
        println!("    Phone  {phone}");
    }
}

pub fn categories(categories: &[Category]) {
    let names: Vec<String> = categories
        .iter()
        .map(|c| format!("[{}] {}", c.id, c.name))
        .collect();
    println!("{}", names.join("  "));
}

pub fn menus(menus: &[MenuItem]) {
    if menus.is_empty() {
        println!("No menus found");
    }
    for menu in menus {
        let unavailable = if menu.is_available {
            ""
        } else {
            "  (sold out)"
        };
        println!("[{}] {:<32} {}{unavailable}", menu.id, menu.name, menu.price);
    }
}

pub fn cart(cart: &Cart) {
    for item in cart.items() {
        println!(
            "{:>3} x {:<28} {}",
            item.quantity,
            item.menu.name,
            item.subtotal()
        );
        if !item.notes.trim().is_empty() {
            println!("        note: {}", item.notes);
        }
    }
    println!("Total {}", cart.total());
}

pub fn channels(channels: &[PaymentChannel]) {
    for channel in channels {
        let description = channel
            .description
            .as_deref()
            .map(|d| format!("  {d}"))
            .unwrap_or_default();
        println!("{:<12} {}{description}", channel.code, channel.name);
    }
}

pub fn placement(placement: &OrderPlacement) {
    println!("Order #{} placed", placement.order.id);
    println!("  Total    {}", placement.order.final_price);
    println!("  Payment  {}", placement.payment.payment_method);
    if let Some(reference) = &placement.payment.reference {
        println!("  Ref      {reference}");
    }
    if let Some(expires) = &placement.payment.expired_time {
        println!("  Pay by   {expires}");
    }
}

pub fn order_row(order: &Order) {
    println!(
        "#{:<6} {:<24} {:<12} {:<8} {}",
        order.id.as_str(),
        order.store_name().unwrap_or("-"),
        order.status.to_string(),
        order.payment_status.to_string(),
        order.final_price
    );
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders yet");
    }
    for order in orders {
        order_row(order);
    }
}

pub fn order_detail(order: &Order) {
    order_row(order);
    println!("  Placed   {}", date(order.created_at));
    for item in &order.items {
        println!(
            "  {:>3} x {:<28} {}",
            item.quantity,
            item.display_name(),
            item.subtotal
        );
        if let Some(notes) = &item.notes {
            println!("          note: {notes}");
        }
    }
    if !order.discount_amount.is_zero() {
        println!("  Subtotal {}", order.total_price);
        println!("  Discount {}", order.discount_amount);
    }
    println!("  Total    {}", order.final_price);
    if let Some(method) = &order.payment_method {
        println!("  Payment  {method}");
    }
    if let Some(notes) = &order.notes {
        println!("  Notes    {notes}");
    }
    if order.status.is_cancellable()
        && let Some(url) = &order.payment_url
    {
        println!("  Pay at   {url}");
    }
}

pub fn payment_report(report: &PaymentStatusReport) {
    println!("Payment {}", report.status);
    if let Some(order_id) = &report.order_id {
        println!("  Order    #{order_id}");
    }
    if let Some(method) = &report.payment_method {
        println!("  Method   {method}");
    }
    if let Some(message) = &report.message {
        println!("  {message}");
    }
    if let Some(url) = &report.payment_url {
        println!("  Pay at   {url}");
    }
}

pub fn vouchers(vouchers: &[Voucher]) {
    if vouchers.is_empty() {
        println!("No vouchers available");
    }
    for voucher in vouchers {
        let used = if voucher.is_used { "  (used)" } else { "" };
        println!("[{}] {} {}{used}", voucher.id, voucher.code, voucher.name);
        println!("    {}", voucher.description);
        if !voucher.min_purchase.is_zero() {
            println!("    Min. purchase {}", voucher.min_purchase);
        }
        if let Some(until) = &voucher.valid_until {
            println!("    Valid until {until}");
        }
    }
}

fn recommendations(picks: &WeatherRecommendation) {
    let weather = &picks.weather;
    println!(
        "{} ({}), {:.0}°C, feels like {:.0}°C",
        weather.weather.main, weather.weather.description, weather.temp, weather.feels_like
    );
    if picks.menus.is_empty() {
        println!("No picks for this weather");
    }
    for menu in &picks.menus {
        println!("[{}] {:<32} {}", menu.id, menu.name, menu.price);
    }
}

/// Each source gets its own section; a failed source shows its error.
pub fn home(feed: &HomeFeed) {
    match &feed.profile {
        Ok(user) => println!("Hello, {}", user.name),
        Err(e) => println!("Profile unavailable: {e}"),
    }

    heading("Nearby stores");
    match &feed.nearby {
        Ok(nearby) => {
            stores(&nearby.stores);
            println!("{} within range", nearby.total);
        }
        Err(e) => println!("{e}"),
    }

    heading("For today's weather");
    match &feed.recommendations {
        Ok(picks) => recommendations(picks),
        Err(e) => println!("{e}"),
    }
}
