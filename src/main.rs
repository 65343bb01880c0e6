// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use course_registry::{init_logging, load_config, CourseFilter, RegistryConfig, RelationalStore};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = load_config(None)?;

    if args.len() > 1 && args[1] == "demo" {
        // Demo mode
        init_logging(&config.log_filter);
        run_demo(&config)?;
    } else {
        // UI mode (default)
        run_ui_mode(&config)?;
    }

    Ok(())
}

fn run_demo(config: &RegistryConfig) -> Result<()> {
    println!("📚 Course Registry - Demo");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = RelationalStore::with_config(config.store.clone());

    let science = store.create_course_type("Science")?;
    let physics = store.create_course("Physics 101", &science.id)?;
    store.create_registration("Alice", &physics.id)?;

    match store.create_course("Bad Course", "nonexistent-id") {
        Ok(_) => anyhow::bail!("dangling course type was accepted"),
        Err(e) => println!("✓ Rejected: {}", e),
    }

    let math = store.create_course_type("Math")?;
    let algebra = store.create_course("Algebra", &math.id)?;
    store.create_registration("Bob", &algebra.id)?;

    println!("\n🏷️  Course Types");
    for course_type in store.list_course_types() {
        println!("   {}", course_type.name);
    }

    println!("\n📖 Courses");
    for view in store.joined_course_view() {
        println!("   {}", view.label());
    }

    println!("\n🔎 Courses in {}", science.name);
    for course in store.list_courses(&CourseFilter::by_type(&science.id)) {
        println!("   {}", course.name);
    }

    println!("\n📝 Registrations");
    for view in store.joined_registration_view() {
        println!("   {}", view.label());
    }

    let stats = store.stats();
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "✓ {} course types, {} courses, {} registrations",
        stats.course_types, stats.courses, stats.registrations
    );

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &RegistryConfig) -> Result<()> {
    // No subscriber here: log lines would draw over the alternate screen
    println!("🖥️  Loading Course Registry UI...\n");
    println!("Starting UI... (Press 'q' to quit)\n");

    let store = RelationalStore::with_config(config.store.clone());
    let mut app = ui::App::new(store);
    ui::run_ui(&mut app)?;

    let stats = app.store.stats();
    println!(
        "\n✅ UI closed ({} course types, {} courses, {} registrations discarded)",
        stats.course_types, stats.courses, stats.registrations
    );

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &RegistryConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin course-server --features server");
    std::process::exit(1);
}
