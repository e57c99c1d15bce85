//! Registration form controller.
//!
//! Drives a [`FormView`] from the shared rule set and the registry API:
//! selector population, per-field validation, the dependent branch
//! selector and the two-step submit (create product, then associate its
//! materials). Reference data lives in the controller, never in globals.
//! `submit` takes `&mut self`, so a second submit cannot start while one is
//! in flight.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::api::{ClientError, ProductApi};
use crate::error::ErrorCode;
use crate::models::lookup::{CurrencyItem, MaterialItem, NamedItem};
use crate::models::product::InsertProductRequest;
use crate::validation::{self, FieldSource, FieldValue, ValidationErrors};

pub const DUPLICATE_CODE: &str = "Este código ya existe";
pub const SUCCESS: &str = "Producto registrado exitosamente";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Warning,
    Error,
}

/// Presentation surface the controller renders into.
pub trait FormView {
    fn render_materials(&mut self, materials: &[MaterialItem]);
    fn render_warehouses(&mut self, warehouses: &[NamedItem]);
    fn render_currencies(&mut self, currencies: &[CurrencyItem]);
    /// Replace the branch options; `enabled` toggles the selector
    fn render_branches(&mut self, branches: &[NamedItem], enabled: bool);
    fn show_field_error(&mut self, field: &str, message: &str);
    fn clear_field_error(&mut self, field: &str);
    fn set_submitting(&mut self, submitting: bool);
    fn show_message(&mut self, message: &str, kind: MessageKind);
    fn reset_form(&mut self);
}

/// Current form input, as typed. Selector values are ids in text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub code: String,
    pub name: String,
    pub warehouse: String,
    pub branch: String,
    pub currency: String,
    pub price: String,
    pub materials: Vec<i64>,
    pub description: String,
}

impl FieldSource for ProductForm {
    fn field_value(&self, field: &str) -> FieldValue<'_> {
        let text = match field {
            "code" => &self.code,
            "name" => &self.name,
            "warehouse" => &self.warehouse,
            "branch" => &self.branch,
            "currency" => &self.currency,
            "price" => &self.price,
            "description" => &self.description,
            "materials" => return FieldValue::Ids(&self.materials),
            _ => return FieldValue::Text(""),
        };
        FieldValue::Text(text.trim())
    }
}

impl ProductForm {
    fn to_request(&self) -> InsertProductRequest {
        InsertProductRequest {
            code: Some(Value::from(self.code.trim())),
            name: Some(Value::from(self.name.trim())),
            price: Some(Value::from(self.price.trim())),
            currency_id: Some(Value::from(self.currency.trim())),
            description: Some(Value::from(self.description.trim())),
        }
    }

    fn material_ids(&self) -> Vec<i32> {
        self.materials
            .iter()
            .filter_map(|id| i32::try_from(*id).ok())
            .collect()
    }
}

/// Selector contents loaded from the server.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub materials: Vec<MaterialItem>,
    pub warehouses: Vec<NamedItem>,
    pub currencies: Vec<CurrencyItem>,
    pub branches: Vec<NamedItem>,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent
    Invalid(ValidationErrors),
    /// The code is taken, by the availability check or by the insert
    Duplicate,
    Created { product_id: i32 },
    /// The product row exists but its materials were not associated
    CreatedWithoutMaterials { product_id: i32, error: ClientError },
    Failed(ClientError),
}

pub struct FormController<A, V> {
    api: A,
    view: V,
    reference: ReferenceData,
}

impl<A: ProductApi, V: FormView> FormController<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            reference: ReferenceData::default(),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Load materials, warehouses and currencies concurrently.
    ///
    /// Each selector is rendered as soon as its data is available; a failed
    /// load is reported and the first error returned.
    pub async fn initialize(&mut self) -> Result<(), ClientError> {
        let (materials, warehouses, currencies) = tokio::join!(
            self.api.materials(),
            self.api.warehouses(),
            self.api.currencies()
        );

        let mut first_error = None;

        match materials {
            Ok(items) => {
                self.view.render_materials(&items);
                self.reference.materials = items;
            }
            Err(e) => self.load_failed("materiales", e, &mut first_error),
        }
        match warehouses {
            Ok(items) => {
                self.view.render_warehouses(&items);
                self.reference.warehouses = items;
            }
            Err(e) => self.load_failed("bodegas", e, &mut first_error),
        }
        match currencies {
            Ok(items) => {
                self.view.render_currencies(&items);
                self.reference.currencies = items;
            }
            Err(e) => self.load_failed("monedas", e, &mut first_error),
        }

        self.reference.branches.clear();
        self.view.render_branches(&[], false);

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn load_failed(&mut self, what: &str, error: ClientError, first: &mut Option<ClientError>) {
        warn!(what, error = %error, "Reference data load failed");
        self.view
            .show_message(&format!("Error cargando {}: {}", what, error), MessageKind::Error);
        first.get_or_insert(error);
    }

    /// Refresh the branch selector for a newly selected warehouse.
    ///
    /// The selector stays disabled while loading, when the warehouse is
    /// cleared and when the fetch fails.
    pub async fn select_warehouse(&mut self, warehouse_id: Option<i32>) -> Result<(), ClientError> {
        self.reference.branches.clear();
        self.view.render_branches(&[], false);

        let Some(warehouse_id) = warehouse_id else {
            return Ok(());
        };

        match self.api.branches(warehouse_id).await {
            Ok(branches) => {
                self.view.render_branches(&branches, true);
                self.reference.branches = branches;
                Ok(())
            }
            Err(e) => {
                self.view.show_message(
                    &format!("Error cargando sucursales: {}", e),
                    MessageKind::Error,
                );
                Err(e)
            }
        }
    }

    /// Evaluate one field's rule and show or clear its error.
    pub fn validate_field(&mut self, form: &ProductForm, field: &str) -> bool {
        let Some(rule) = validation::PRODUCT_FORM.rule(field) else {
            return true;
        };

        match rule.first_failure(form.field_value(field)) {
            Some(message) => {
                self.view.show_field_error(field, message);
                false
            }
            None => {
                self.view.clear_field_error(field);
                true
            }
        }
    }

    /// Local code rules followed by the server availability check.
    pub async fn validate_code(&mut self, form: &ProductForm) -> bool {
        if !self.validate_field(form, "code") {
            return false;
        }

        match self.api.check_code(form.code.trim()).await {
            Ok(true) => true,
            Ok(false) => {
                self.view.show_field_error("code", DUPLICATE_CODE);
                false
            }
            Err(e) => {
                self.view
                    .show_field_error("code", &format!("Error verificando código: {}", e));
                false
            }
        }
    }

    pub async fn submit(&mut self, form: &ProductForm) -> SubmitOutcome {
        for rule in validation::PRODUCT_FORM.fields {
            self.view.clear_field_error(rule.field);
        }

        if let Err(errors) = validation::PRODUCT_FORM.validate(form) {
            for violation in errors.violations() {
                self.view.show_field_error(violation.field, violation.message);
            }
            return SubmitOutcome::Invalid(errors);
        }

        self.view.set_submitting(true);
        let outcome = self.send(form).await;
        self.view.set_submitting(false);

        outcome
    }

    async fn send(&mut self, form: &ProductForm) -> SubmitOutcome {
        match self.api.check_code(form.code.trim()).await {
            Ok(true) => {}
            Ok(false) => {
                self.view.show_field_error("code", DUPLICATE_CODE);
                return SubmitOutcome::Duplicate;
            }
            Err(e) => {
                self.view.show_message(
                    &format!("Error verificando código: {}", e),
                    MessageKind::Error,
                );
                return SubmitOutcome::Failed(e);
            }
        }

        let created = match self.api.insert_product(&form.to_request()).await {
            Ok(created) => created,
            Err(e) if e.code() == Some(ErrorCode::Duplicate) => {
                self.view.show_field_error("code", DUPLICATE_CODE);
                return SubmitOutcome::Duplicate;
            }
            Err(e) => {
                self.view.show_message(&e.to_string(), MessageKind::Error);
                return SubmitOutcome::Failed(e);
            }
        };
        debug!(product_id = created.id, "Product created, associating materials");

        if let Err(e) = self
            .api
            .associate_materials(created.id, &form.material_ids())
            .await
        {
            self.view.show_message(
                &format!(
                    "Producto registrado, pero falló la asociación de materiales: {}",
                    e
                ),
                MessageKind::Warning,
            );
            return SubmitOutcome::CreatedWithoutMaterials {
                product_id: created.id,
                error: e,
            };
        }

        self.view.show_message(SUCCESS, MessageKind::Success);
        self.view.reset_form();
        self.reference.branches.clear();
        self.view.render_branches(&[], false);

        SubmitOutcome::Created {
            product_id: created.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::material::AssociateMaterialsResponse;
    use crate::models::product::InsertProductResponse;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeState {
        taken_codes: HashSet<String>,
        next_id: i32,
        inserted: Vec<InsertProductRequest>,
        associations: HashMap<i32, Vec<i32>>,
        check_calls: usize,
    }

    #[derive(Default)]
    struct FakeApi {
        state: Mutex<FakeState>,
        fail_materials: bool,
        fail_branches: bool,
        fail_association: bool,
        // Simulates losing the race: the check says free, the insert conflicts
        conflict_on_insert: bool,
    }

    impl FakeApi {
        fn with_taken(codes: &[&str]) -> Self {
            let api = FakeApi::default();
            api.state.lock().unwrap().taken_codes = codes.iter().map(|c| c.to_string()).collect();
            api
        }

        fn api_error(code: ErrorCode, message: &str) -> ClientError {
            ClientError::Api {
                code,
                message: message.to_string(),
            }
        }
    }

    #[async_trait]
    impl ProductApi for FakeApi {
        async fn materials(&self) -> Result<Vec<MaterialItem>, ClientError> {
            if self.fail_materials {
                return Err(Self::api_error(ErrorCode::StoreError, "db down"));
            }
            Ok(vec![
                MaterialItem { id: 1, code: "WOOD1".into(), description: "Madera".into() },
                MaterialItem { id: 2, code: "STEEL1".into(), description: "Acero".into() },
            ])
        }

        async fn warehouses(&self) -> Result<Vec<NamedItem>, ClientError> {
            Ok(vec![NamedItem { id: 1, name: "Bodega Central".into() }])
        }

        async fn branches(&self, warehouse_id: i32) -> Result<Vec<NamedItem>, ClientError> {
            if self.fail_branches {
                return Err(Self::api_error(ErrorCode::StoreError, "db down"));
            }
            Ok(vec![
                NamedItem { id: warehouse_id * 10, name: "Sucursal Centro".into() },
                NamedItem { id: warehouse_id * 10 + 1, name: "Sucursal Plaza".into() },
            ])
        }

        async fn currencies(&self) -> Result<Vec<CurrencyItem>, ClientError> {
            Ok(vec![CurrencyItem { id: 1, name: "Peso Chileno".into(), symbol: "CLP".into() }])
        }

        async fn check_code(&self, code: &str) -> Result<bool, ClientError> {
            let mut state = self.state.lock().unwrap();
            state.check_calls += 1;
            Ok(!state.taken_codes.contains(code))
        }

        async fn insert_product(
            &self,
            request: &InsertProductRequest,
        ) -> Result<InsertProductResponse, ClientError> {
            if self.conflict_on_insert {
                return Err(Self::api_error(ErrorCode::Duplicate, DUPLICATE_CODE));
            }
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            state.inserted.push(request.clone());
            Ok(InsertProductResponse {
                success: true,
                id: state.next_id,
                created_at: chrono::Utc::now().fixed_offset(),
            })
        }

        async fn associate_materials(
            &self,
            product_id: i32,
            material_ids: &[i32],
        ) -> Result<AssociateMaterialsResponse, ClientError> {
            if self.fail_association {
                return Err(Self::api_error(
                    ErrorCode::NotFound,
                    "Uno o más materiales no existen",
                ));
            }
            let mut state = self.state.lock().unwrap();
            state.associations.insert(product_id, material_ids.to_vec());
            Ok(AssociateMaterialsResponse {
                success: true,
                message: format!("Se asociaron {} materiales al producto", material_ids.len()),
                product_id,
                material_ids: material_ids.to_vec(),
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Materials(usize),
        Warehouses(usize),
        Currencies(usize),
        Branches(usize, bool),
        FieldError(String, String),
        ClearFieldError(String),
        Submitting(bool),
        Message(String, MessageKind),
        Reset,
    }

    #[derive(Default)]
    struct RecordingView {
        events: Vec<Event>,
    }

    impl RecordingView {
        fn field_errors(&self) -> Vec<(String, String)> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::FieldError(f, m) => Some((f.clone(), m.clone())),
                    _ => None,
                })
                .collect()
        }

        fn messages(&self) -> Vec<(String, MessageKind)> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Message(m, k) => Some((m.clone(), *k)),
                    _ => None,
                })
                .collect()
        }

        fn last_branches(&self) -> Option<(usize, bool)> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Branches(n, enabled) => Some((*n, *enabled)),
                _ => None,
            })
        }
    }

    impl FormView for RecordingView {
        fn render_materials(&mut self, materials: &[MaterialItem]) {
            self.events.push(Event::Materials(materials.len()));
        }
        fn render_warehouses(&mut self, warehouses: &[NamedItem]) {
            self.events.push(Event::Warehouses(warehouses.len()));
        }
        fn render_currencies(&mut self, currencies: &[CurrencyItem]) {
            self.events.push(Event::Currencies(currencies.len()));
        }
        fn render_branches(&mut self, branches: &[NamedItem], enabled: bool) {
            self.events.push(Event::Branches(branches.len(), enabled));
        }
        fn show_field_error(&mut self, field: &str, message: &str) {
            self.events
                .push(Event::FieldError(field.to_string(), message.to_string()));
        }
        fn clear_field_error(&mut self, field: &str) {
            self.events.push(Event::ClearFieldError(field.to_string()));
        }
        fn set_submitting(&mut self, submitting: bool) {
            self.events.push(Event::Submitting(submitting));
        }
        fn show_message(&mut self, message: &str, kind: MessageKind) {
            self.events.push(Event::Message(message.to_string(), kind));
        }
        fn reset_form(&mut self) {
            self.events.push(Event::Reset);
        }
    }

    fn valid_form() -> ProductForm {
        ProductForm {
            code: "ABC12".into(),
            name: "Widget".into(),
            warehouse: "1".into(),
            branch: "10".into(),
            currency: "1".into(),
            price: "9.99".into(),
            materials: vec![1, 2],
            description: "A valid widget description.".into(),
        }
    }

    fn controller(api: FakeApi) -> FormController<FakeApi, RecordingView> {
        FormController::new(api, RecordingView::default())
    }

    #[tokio::test]
    async fn test_initialize_renders_all_selectors() {
        let mut ctrl = controller(FakeApi::default());
        ctrl.initialize().await.unwrap();

        let events = &ctrl.view().events;
        assert!(events.contains(&Event::Materials(2)));
        assert!(events.contains(&Event::Warehouses(1)));
        assert!(events.contains(&Event::Currencies(1)));
        assert_eq!(ctrl.view().last_branches(), Some((0, false)));
        assert_eq!(ctrl.reference().materials.len(), 2);
    }

    #[tokio::test]
    async fn test_initialize_reports_failed_load_and_keeps_others() {
        let mut ctrl = controller(FakeApi {
            fail_materials: true,
            ..Default::default()
        });
        assert!(ctrl.initialize().await.is_err());

        let messages = ctrl.view().messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].0.starts_with("Error cargando materiales"));
        assert_eq!(ctrl.reference().warehouses.len(), 1);
        assert!(ctrl.reference().materials.is_empty());
    }

    #[tokio::test]
    async fn test_select_warehouse_enables_branches() {
        let mut ctrl = controller(FakeApi::default());
        ctrl.select_warehouse(Some(1)).await.unwrap();

        let branch_events: Vec<_> = ctrl
            .view()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Branches(..)))
            .cloned()
            .collect();
        assert_eq!(branch_events, vec![Event::Branches(0, false), Event::Branches(2, true)]);
        assert_eq!(ctrl.reference().branches.len(), 2);
    }

    #[tokio::test]
    async fn test_clearing_warehouse_disables_branches() {
        let mut ctrl = controller(FakeApi::default());
        ctrl.select_warehouse(Some(1)).await.unwrap();
        ctrl.select_warehouse(None).await.unwrap();

        assert_eq!(ctrl.view().last_branches(), Some((0, false)));
        assert!(ctrl.reference().branches.is_empty());
    }

    #[tokio::test]
    async fn test_branch_fetch_failure_leaves_selector_disabled() {
        let mut ctrl = controller(FakeApi {
            fail_branches: true,
            ..Default::default()
        });
        assert!(ctrl.select_warehouse(Some(1)).await.is_err());
        assert_eq!(ctrl.view().last_branches(), Some((0, false)));
    }

    #[test]
    fn test_validate_field_shows_and_clears() {
        let mut ctrl = controller(FakeApi::default());
        let mut form = valid_form();
        form.price = "19.999".into();

        assert!(!ctrl.validate_field(&form, "price"));
        form.price = "19.99".into();
        assert!(ctrl.validate_field(&form, "price"));

        assert_eq!(
            ctrl.view().field_errors(),
            vec![("price".to_string(), "El precio debe tener máximo 2 decimales".to_string())]
        );
        assert_eq!(
            ctrl.view().events.last(),
            Some(&Event::ClearFieldError("price".into()))
        );
    }

    #[test]
    fn test_validate_field_rejects_price_beyond_column() {
        let mut ctrl = controller(FakeApi::default());
        let mut form = valid_form();
        form.price = "100000000".into();
        assert!(!ctrl.validate_field(&form, "price"));
        assert_eq!(
            ctrl.view().field_errors(),
            vec![("price".to_string(), "El precio debe ser menor a 100000000".to_string())]
        );

        form.price = "99999999.99".into();
        assert!(ctrl.validate_field(&form, "price"));
    }

    #[tokio::test]
    async fn test_validate_code_checks_availability() {
        let mut ctrl = controller(FakeApi::with_taken(&["ABC12"]));
        assert!(!ctrl.validate_code(&valid_form()).await);
        assert_eq!(
            ctrl.view().field_errors(),
            vec![("code".to_string(), DUPLICATE_CODE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_validate_code_skips_server_for_bad_format() {
        let mut ctrl = controller(FakeApi::default());
        let mut form = valid_form();
        form.code = "ABCDEF".into();

        assert!(!ctrl.validate_code(&form).await);
        assert_eq!(ctrl.api().state.lock().unwrap().check_calls, 0);
    }

    #[tokio::test]
    async fn test_submit_invalid_form_sends_nothing() {
        let mut ctrl = controller(FakeApi::default());
        let mut form = valid_form();
        form.materials = vec![1];
        form.branch = String::new();

        let outcome = ctrl.submit(&form).await;
        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected invalid outcome");
        };
        let fields: Vec<_> = errors.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["branch", "materials"]);

        let state = ctrl.api().state.lock().unwrap();
        assert_eq!(state.check_calls, 0);
        assert!(state.inserted.is_empty());
        drop(state);
        assert!(!ctrl.view().events.contains(&Event::Submitting(true)));
    }

    #[tokio::test]
    async fn test_submit_success() {
        let mut ctrl = controller(FakeApi::default());
        ctrl.select_warehouse(Some(1)).await.unwrap();

        let outcome = ctrl.submit(&valid_form()).await;
        assert!(matches!(outcome, SubmitOutcome::Created { product_id: 1 }));

        let state = ctrl.api().state.lock().unwrap();
        assert_eq!(state.associations.get(&1), Some(&vec![1, 2]));
        assert_eq!(state.inserted[0].price, Some(Value::from("9.99")));
        drop(state);

        let view = ctrl.view();
        assert_eq!(view.messages(), vec![(SUCCESS.to_string(), MessageKind::Success)]);
        assert!(view.events.contains(&Event::Reset));
        assert_eq!(view.last_branches(), Some((0, false)));
        assert!(ctrl.reference().branches.is_empty());
    }

    #[tokio::test]
    async fn test_submit_toggles_submitting_around_request() {
        let mut ctrl = controller(FakeApi::default());
        ctrl.submit(&valid_form()).await;

        let toggles: Vec<_> = ctrl
            .view()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Submitting(_)))
            .cloned()
            .collect();
        assert_eq!(toggles, vec![Event::Submitting(true), Event::Submitting(false)]);
    }

    #[tokio::test]
    async fn test_submit_duplicate_from_check() {
        let mut ctrl = controller(FakeApi::with_taken(&["ABC12"]));
        let outcome = ctrl.submit(&valid_form()).await;

        assert!(matches!(outcome, SubmitOutcome::Duplicate));
        assert!(ctrl.api().state.lock().unwrap().inserted.is_empty());
        assert_eq!(ctrl.view().events.last(), Some(&Event::Submitting(false)));
    }

    #[tokio::test]
    async fn test_submit_duplicate_from_insert_uses_error_code() {
        let mut ctrl = controller(FakeApi {
            conflict_on_insert: true,
            ..Default::default()
        });
        let outcome = ctrl.submit(&valid_form()).await;

        assert!(matches!(outcome, SubmitOutcome::Duplicate));
        assert!(ctrl
            .view()
            .field_errors()
            .contains(&("code".to_string(), DUPLICATE_CODE.to_string())));
    }

    #[tokio::test]
    async fn test_submit_created_without_materials() {
        let mut ctrl = controller(FakeApi {
            fail_association: true,
            ..Default::default()
        });
        let outcome = ctrl.submit(&valid_form()).await;

        let SubmitOutcome::CreatedWithoutMaterials { product_id, error } = outcome else {
            panic!("expected partial outcome");
        };
        assert_eq!(product_id, 1);
        assert_eq!(error.code(), Some(ErrorCode::NotFound));

        let messages = ctrl.view().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, MessageKind::Warning);
        assert!(!ctrl.view().events.contains(&Event::Reset));
    }

    #[test]
    fn test_form_deserializes_with_defaults() {
        let form: ProductForm =
            serde_json::from_value(serde_json::json!({"code": "ABC12", "materials": [1, 2]}))
                .unwrap();
        assert_eq!(form.code, "ABC12");
        assert_eq!(form.materials, vec![1, 2]);
        assert!(form.name.is_empty());
    }
}
