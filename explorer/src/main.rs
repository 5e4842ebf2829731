use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{fmt, EnvFilter};

use catalog::{utils::category_label, Client, Product};
use explorer::browser::{Browser, SortOrder};
use explorer::cart::CartStore;
use explorer::config::Config;

#[derive(Parser)]
#[command(name = "food-explorer")]
#[command(about = "Browse a public food-product catalog and manage a local cart", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the default product feed
    Browse {
        /// Number of feed pages to accumulate
        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[arg(long, value_enum, default_value_t = SortOrder::NameAsc)]
        sort: SortOrder,
    },

    /// Free-text product search
    Search {
        term: String,

        #[arg(long, value_enum, default_value_t = SortOrder::NameAsc)]
        sort: SortOrder,
    },

    /// List the products of one category
    Category {
        tag: String,

        #[arg(long, value_enum, default_value_t = SortOrder::NameAsc)]
        sort: SortOrder,
    },

    /// List the catalog's categories used for filtering
    Categories,

    /// Show one product by barcode
    Show { barcode: String },

    /// Operate on the persisted shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },

    /// Interactive browsing session
    Shell,
}

#[derive(Subcommand)]
enum CartCommands {
    /// Fetch a product by barcode and add it to the cart
    Add { barcode: String },

    /// Print the cart contents
    List,

    /// Remove a line by product code
    Remove { code: String },

    /// Set a line's quantity (0 removes the line)
    Set { code: String, quantity: u32 },

    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = Config::load();
    let client = Client::new(&config.base_url, config.page_size);

    match cli.command {
        Commands::Browse { pages, sort } => browse(&client, pages, sort).await,
        Commands::Search { term, sort } => {
            let mut browser = Browser::new(client.clone());
            browser.set_sort(sort);
            browser.search(&term).await;
            print_products(&browser.sorted());
        }
        Commands::Category { tag, sort } => {
            let mut browser = Browser::new(client.clone());
            browser.set_sort(sort);
            browser.filter_category(&tag).await;
            print_products(&browser.sorted());
        }
        Commands::Categories => print_categories(&client).await,
        Commands::Show { barcode } => {
            let cart = CartStore::open(config.cart_path.clone());
            show(&client, &cart, &barcode).await;
        }
        Commands::Cart { command } => {
            let mut cart = CartStore::open(config.cart_path.clone());
            run_cart_command(&client, &mut cart, command).await;
        }
        Commands::Shell => shell(&client, &config).await?,
    }

    Ok(())
}

async fn browse(client: &Client, pages: u32, sort: SortOrder) {
    let mut browser = Browser::new(client.clone());
    browser.set_sort(sort);

    let pb = ProgressBar::new(pages as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("=> "),
    );

    pb.set_message("Fetching page 1");
    browser.load_initial().await;
    pb.inc(1);

    while browser.page() < pages && browser.has_more() {
        pb.set_message(format!("Fetching page {}", browser.page() + 1));
        browser.load_more().await;
        pb.inc(1);
    }
    pb.finish_and_clear();

    print_products(&browser.sorted());
    if browser.has_more() {
        println!("\nMore pages are available (--pages {}).", pages + 1);
    }
}

async fn print_categories(client: &Client) {
    let categories = client.categories().await;
    if categories.is_empty() {
        println!("No categories available.");
        return;
    }
    // The filter UI only ever offers the first ten.
    for category in categories.iter().take(10) {
        println!("{:<40} {}", category.label(), category.id);
    }
}

async fn show(client: &Client, cart: &CartStore, barcode: &str) {
    match client.by_barcode(barcode).await {
        Some(product) => print_detail(&product, barcode, cart.contains(&product.code)),
        None => println!("The product with barcode {barcode} could not be found."),
    }
}

async fn run_cart_command(client: &Client, cart: &mut CartStore, command: CartCommands) {
    match command {
        CartCommands::Add { barcode } => match client.by_barcode(&barcode).await {
            Some(product) => {
                cart.add(&product);
                println!(
                    "Added {} to cart (total items: {})",
                    display_name(&product),
                    cart.total()
                );
            }
            None => println!("Product not found with this barcode"),
        },
        CartCommands::List => print_cart(cart),
        CartCommands::Remove { code } => {
            cart.remove(&code);
            print_cart(cart);
        }
        CartCommands::Set { code, quantity } => {
            cart.set_quantity(&code, quantity);
            print_cart(cart);
        }
        CartCommands::Clear => {
            cart.clear();
            println!("Cart cleared.");
        }
    }
}

async fn shell(client: &Client, config: &Config) -> Result<()> {
    let mut browser = Browser::new(client.clone());
    let mut cart = CartStore::open(config.cart_path.clone());

    println!("Food Product Explorer -- type 'help' for commands");
    browser.load_initial().await;
    print_products(&browser.sorted());

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "help" => print_help(),
            "search" => {
                browser.search(rest).await;
                print_products(&browser.sorted());
            }
            "category" => {
                browser.filter_category(rest).await;
                print_products(&browser.sorted());
            }
            "categories" => print_categories(client).await,
            "more" => {
                if browser.has_more() {
                    browser.load_more().await;
                    print_products(&browser.sorted());
                } else {
                    println!("No more pages.");
                }
            }
            "sort" => match parse_sort(rest) {
                Some(order) => {
                    browser.set_sort(order);
                    print_products(&browser.sorted());
                }
                None => println!("Sort orders: name-asc, name-desc, grade-asc, grade-desc"),
            },
            "show" => show(client, &cart, rest).await,
            "add" => match rest.parse::<usize>() {
                Ok(index) if index >= 1 => {
                    let listing = browser.sorted();
                    match listing.get(index - 1) {
                        Some(product) => {
                            cart.add(product);
                            println!(
                                "Added {} to cart (total items: {})",
                                display_name(product),
                                cart.total()
                            );
                        }
                        None => println!("No product at position {index}."),
                    }
                }
                _ => println!("Usage: add <listing position>"),
            },
            "cart" => print_cart(&cart),
            "remove" => {
                cart.remove(rest);
                print_cart(&cart);
            }
            "set" => match rest.split_once(' ') {
                Some((code, quantity)) => match quantity.trim().parse() {
                    Ok(quantity) => {
                        cart.set_quantity(code, quantity);
                        print_cart(&cart);
                    }
                    Err(_) => println!("Usage: set <code> <quantity>"),
                },
                None => println!("Usage: set <code> <quantity>"),
            },
            "clear" => {
                cart.clear();
                println!("Cart cleared.");
            }
            "quit" | "exit" => break,
            _ => println!("Unknown command {command:?}, type 'help'"),
        }
    }

    Ok(())
}

fn parse_sort(input: &str) -> Option<SortOrder> {
    match input {
        "name-asc" => Some(SortOrder::NameAsc),
        "name-desc" => Some(SortOrder::NameDesc),
        "grade-asc" => Some(SortOrder::GradeAsc),
        "grade-desc" => Some(SortOrder::GradeDesc),
        _ => None,
    }
}

fn print_help() {
    println!("  search <terms>     free-text search (blank returns to the feed)");
    println!("  category <tag>     filter by category tag (blank returns to the feed)");
    println!("  categories         list the catalog's filter categories");
    println!("  more               load the next feed page");
    println!("  sort <order>       name-asc | name-desc | grade-asc | grade-desc");
    println!("  show <barcode>     product detail by barcode");
    println!("  add <position>     add the n-th listed product to the cart");
    println!("  cart               print the cart");
    println!("  remove <code>      remove a cart line");
    println!("  set <code> <qty>   set a line's quantity (0 removes)");
    println!("  clear              empty the cart");
    println!("  quit               leave");
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found. Try a different search term or filter.");
        return;
    }
    for (position, product) in products.iter().enumerate() {
        println!(
            "{:>3}. [{}] {}",
            position + 1,
            grade_badge(product),
            display_name(product)
        );
        if let Some(tag) = product.category_tags.first() {
            println!("     {}", category_label(tag));
        }
        if let Some(ingredients) = &product.ingredients {
            println!("     Ingredients: {}", truncate(ingredients, 100));
        }
    }
}

fn print_detail(product: &Product, barcode: &str, in_cart: bool) {
    println!("{}", display_name(product));
    println!("  Barcode: {barcode}");
    if let Some(brands) = &product.brands {
        println!("  Brand: {brands}");
    }
    if let Some(categories) = &product.categories {
        println!("  Category: {categories}");
    }
    if let Some(image) = &product.image {
        println!("  Image: {image}");
    }
    if let Some(ingredients) = &product.ingredients {
        println!("  Ingredients: {ingredients}");
    }

    let nutriments = &product.nutriments;
    if !nutriments.is_empty() {
        println!("  Nutritional values (per 100g):");
        if let Some(energy) = nutriments.energy {
            match nutriments.energy_kcal {
                Some(kcal) => println!("    Energy: {energy} kJ ({kcal} kcal)"),
                None => println!("    Energy: {energy} kJ"),
            }
        }
        if let Some(fat) = nutriments.fat {
            println!("    Fat: {fat} g");
        }
        if let Some(carbohydrates) = nutriments.carbohydrates {
            println!("    Carbohydrates: {carbohydrates} g");
        }
        if let Some(proteins) = nutriments.proteins {
            println!("    Proteins: {proteins} g");
        }
        if let Some(salt) = nutriments.salt {
            println!("    Salt: {salt} g");
        }
    }

    println!("  Nutrition grade: {}", grade_badge(product));
    if let Some(labels) = &product.labels {
        let labels: Vec<&str> = labels.split(',').map(str::trim).collect();
        println!("  Labels: {}", labels.join(" | "));
    }
    if in_cart {
        println!("  In cart");
    }
}

fn print_cart(cart: &CartStore) {
    if cart.items().is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in cart.items() {
        println!(
            "{:>3} x {} ({})",
            item.quantity,
            display_name(&item.product),
            item.product.code
        );
    }
    println!("Total items: {}", cart.total());
}

fn display_name(product: &Product) -> &str {
    product.name.as_deref().unwrap_or("Unknown Product")
}

fn grade_badge(product: &Product) -> String {
    product
        .grade
        .as_deref()
        .unwrap_or("unknown")
        .to_uppercase()
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    }
}
