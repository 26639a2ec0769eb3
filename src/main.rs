use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;
use colored::*;
use depot::error::{DepotError, Result};
use depot::model::{Category, Entity, MovementType, Product, StockMovement};
use depot::paths::DataPaths;
use depot::service::Inventory;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = DataPaths::resolve(cli.data_dir.clone())?;
    let mut inventory = Inventory::open(&paths)?;

    match cli.command {
        Commands::Add {
            name,
            price,
            category,
            quantity,
        } => handle_add(&mut inventory, &name, price, category, quantity),
        Commands::List { category, low } => handle_list(&inventory, category, low),
        Commands::Show { id } => handle_show(&inventory, id),
        Commands::Update {
            id,
            name,
            price,
            category,
            quantity,
        } => handle_update(&mut inventory, id, name, price, category, quantity),
        Commands::Inc { id, amount, reason } => {
            inventory.increase_stock(id, amount, reason.as_deref())?;
            if let Some(p) = inventory.product(id) {
                println!("Stock increased: {} now at {}", p.name().bold(), p.quantity());
            }
            Ok(())
        }
        Commands::Dec { id, amount, reason } => {
            inventory.decrease_stock(id, amount, reason.as_deref())?;
            if let Some(p) = inventory.product(id) {
                println!("Stock decreased: {} now at {}", p.name().bold(), p.quantity());
            }
            Ok(())
        }
        Commands::Deactivate { id } => {
            inventory.deactivate_product(id)?;
            println!("Product {} deactivated", id);
            Ok(())
        }
        Commands::Remove { id } => {
            inventory.delete_product(id)?;
            println!("Product {} permanently removed", id);
            Ok(())
        }
        Commands::History {
            product,
            movement_type,
            from,
            to,
        } => handle_history(&inventory, product, movement_type, from, to),
        Commands::Search { term } => {
            let found = inventory.products().search_by_name(&term);
            if found.is_empty() {
                println!("No products match \"{}\"", term);
            }
            for p in found {
                print_product(p);
            }
            Ok(())
        }
        Commands::Summary => handle_summary(&inventory),
        Commands::Reset { yes } => handle_reset(&mut inventory, yes),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "depot=debug" } else { "depot=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn handle_add(
    inventory: &mut Inventory,
    name: &str,
    price: f64,
    category: Category,
    quantity: u32,
) -> Result<()> {
    let id = inventory.create_product(name, price, category, quantity)?;
    println!("Added product {} with id {}", name.bold(), id.to_string().green());
    Ok(())
}

fn handle_list(inventory: &Inventory, category: Option<Category>, low: Option<u32>) -> Result<()> {
    let products = select_products(inventory, category, low);

    if products.is_empty() {
        println!("No products.");
        return Ok(());
    }
    for p in products {
        print_product(p);
    }
    Ok(())
}

/// Applies the list filters together: a category restricts the low-stock
/// listing rather than being discarded by it.
fn select_products(
    inventory: &Inventory,
    category: Option<Category>,
    low: Option<u32>,
) -> Vec<&Product> {
    match (category, low) {
        (Some(category), Some(threshold)) => inventory
            .products()
            .low_stock(threshold)
            .into_iter()
            .filter(|p| p.category() == category)
            .collect(),
        (None, Some(threshold)) => inventory.products().low_stock(threshold),
        (Some(category), None) => inventory.products().by_category(category),
        (None, None) => inventory.products().active().collect(),
    }
}

fn handle_show(inventory: &Inventory, id: u32) -> Result<()> {
    let p = inventory.product(id).ok_or(DepotError::NotFound(id))?;
    print_product(p);
    if !p.is_active() {
        println!("  {}", "(deactivated)".dimmed());
    }
    println!("  total value: {:.2}", p.total_value());

    let trail = inventory.movements().by_product(id);
    if !trail.is_empty() {
        println!("  history:");
        for m in trail {
            print_movement(m);
        }
    }
    Ok(())
}

fn handle_update(
    inventory: &mut Inventory,
    id: u32,
    name: Option<String>,
    price: Option<f64>,
    category: Option<Category>,
    quantity: Option<u32>,
) -> Result<()> {
    let mut product = inventory
        .product(id)
        .cloned()
        .ok_or(DepotError::NotFound(id))?;

    if let Some(name) = name {
        product.rename(&name)?;
    }
    if let Some(price) = price {
        product.set_price(price)?;
    }
    if let Some(category) = category {
        product.set_category(category);
    }
    if let Some(quantity) = quantity {
        product.set_quantity(quantity);
    }

    inventory.update_product(product)?;
    println!("Product {} updated", id);
    Ok(())
}

fn handle_history(
    inventory: &Inventory,
    product: Option<u32>,
    movement_type: Option<MovementType>,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    let movements: Vec<&StockMovement> = if let Some(product_id) = product {
        inventory.movements().by_product(product_id)
    } else if let Some(t) = movement_type {
        inventory.movements().by_movement_type(t)
    } else if from.is_some() || to.is_some() {
        let from = parse_day(from.as_deref(), NaiveDateTime::MIN, false)?;
        let to = parse_day(to.as_deref(), NaiveDateTime::MAX, true)?;
        inventory.movements().by_date_range(from, to)
    } else {
        let mut all: Vec<&StockMovement> = inventory.movements().active().collect();
        all.sort_by(|a, b| b.date().cmp(&a.date()));
        all
    };

    if movements.is_empty() {
        println!("No movements.");
        return Ok(());
    }
    for m in movements {
        print_movement(m);
    }
    Ok(())
}

fn handle_summary(inventory: &Inventory) -> Result<()> {
    println!("{}", "Inventory summary".bold());
    println!("  active products: {}", inventory.products().count());
    println!("  units on hand:   {}", inventory.total_quantity());
    println!("  total value:     {:.2}", inventory.total_inventory_value());

    if let Some(p) = inventory.most_expensive() {
        println!("  most expensive:  {} ({:.2})", p.name(), p.price());
    }
    if let Some(p) = inventory.least_expensive() {
        println!("  least expensive: {} ({:.2})", p.name(), p.price());
    }

    let by_category = inventory.products().count_by_category();
    if !by_category.is_empty() {
        println!("  by category:");
        for category in Category::ALL {
            if let Some(count) = by_category.get(&category) {
                println!("    {:<12} {}", category.to_string(), count);
            }
        }
    }

    let by_type = inventory.movements().count_by_type();
    if !by_type.is_empty() {
        println!("  movements:");
        for movement_type in MovementType::ALL {
            if let Some(count) = by_type.get(&movement_type) {
                println!("    {:<12} {}", movement_type.to_string(), count);
            }
        }
    }
    Ok(())
}

fn handle_reset(inventory: &mut Inventory, yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes all products and movement history. Pass --yes to confirm.");
        return Ok(());
    }
    inventory.reset_all_data()?;
    println!("All data deleted.");
    Ok(())
}

fn parse_day(raw: Option<&str>, default: NaiveDateTime, end_of_day: bool) -> Result<NaiveDateTime> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| DepotError::Validation(format!("invalid date: {raw}")))?;
    let stamp = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    Ok(stamp.expect("in-range time of day"))
}

fn print_product(p: &Product) {
    println!(
        "{:>4}  {:<24} {:>10.2}  {:<12} qty {:>5}",
        p.id().to_string().green(),
        p.name(),
        p.price(),
        p.category().to_string(),
        p.quantity()
    );
}

fn print_movement(m: &StockMovement) {
    let change = if m.quantity_change() >= 0 {
        format!("+{}", m.quantity_change()).green()
    } else {
        m.quantity_change().to_string().red()
    };
    println!(
        "{:>4}  {}  {:<12} product {:>4}  {:>6}  {}",
        m.id(),
        m.date().format("%Y-%m-%d %H:%M:%S"),
        m.movement_type().to_string(),
        m.product_id(),
        change,
        m.reason()
    );
}
