use std::env;
use std::fs;

use product_registry::client::api::{HttpProductApi, DEFAULT_BASE_URL};
use product_registry::client::controller::{
    FormController, FormView, MessageKind, ProductForm, SubmitOutcome,
};
use product_registry::models::lookup::{CurrencyItem, MaterialItem, NamedItem};
use product_registry::validation::parse_id;

/// Prints every view update to the terminal.
struct TerminalView;

impl FormView for TerminalView {
    fn render_materials(&mut self, materials: &[MaterialItem]) {
        println!("Materiales:");
        for m in materials {
            println!("  [{}] {} - {}", m.id, m.code, m.description);
        }
    }

    fn render_warehouses(&mut self, warehouses: &[NamedItem]) {
        println!("Bodegas:");
        for w in warehouses {
            println!("  [{}] {}", w.id, w.name);
        }
    }

    fn render_currencies(&mut self, currencies: &[CurrencyItem]) {
        println!("Monedas:");
        for c in currencies {
            println!("  [{}] {} ({})", c.id, c.name, c.symbol);
        }
    }

    fn render_branches(&mut self, branches: &[NamedItem], enabled: bool) {
        if !enabled {
            return;
        }
        println!("Sucursales:");
        for b in branches {
            println!("  [{}] {}", b.id, b.name);
        }
    }

    fn show_field_error(&mut self, field: &str, message: &str) {
        eprintln!("✗ {}: {}", field, message);
    }

    fn clear_field_error(&mut self, _field: &str) {}

    fn set_submitting(&mut self, submitting: bool) {
        if submitting {
            println!("Guardando...");
        }
    }

    fn show_message(&mut self, message: &str, kind: MessageKind) {
        match kind {
            MessageKind::Success => println!("✓ {}", message),
            MessageKind::Warning => println!("⚠ {}", message),
            MessageKind::Error => eprintln!("✗ {}", message),
        }
    }

    fn reset_form(&mut self) {}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <form.json>", args[0]);
        eprintln!("Server URL is read from PRODUCT_REGISTRY_URL (default {})", DEFAULT_BASE_URL);
        std::process::exit(1);
    }

    dotenvy::dotenv().ok();
    let base_url =
        env::var("PRODUCT_REGISTRY_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let form: ProductForm = serde_json::from_str(&fs::read_to_string(&args[1])?)?;

    let mut controller = FormController::new(HttpProductApi::new(base_url), TerminalView);
    controller.initialize().await?;
    controller.select_warehouse(parse_id(&form.warehouse)).await?;

    match controller.submit(&form).await {
        SubmitOutcome::Created { product_id } => {
            println!("Producto {} registrado", product_id);
            Ok(())
        }
        SubmitOutcome::CreatedWithoutMaterials { product_id, .. } => {
            println!("Producto {} registrado sin materiales", product_id);
            std::process::exit(2);
        }
        SubmitOutcome::Invalid(_) | SubmitOutcome::Duplicate => std::process::exit(1),
        SubmitOutcome::Failed(e) => Err(e.into()),
    }
}
