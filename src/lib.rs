#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod families;
pub mod spectral;

use std::fmt;

use families::{Family, FamilyRegistry, Output, ParamMap, Representation};
use serde::Serialize;
use spectral::CmfResult;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    // A second call (several engines on one page) keeps the first logger.
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start the rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// One entry of [`Engine::families`].
#[derive(Debug, Clone, Serialize)]
pub struct FamilyExport {
    pub name: &'static str,
    pub aliases: Vec<&'static str>,
    pub flags: Vec<&'static str>,
    pub standard: bool,
}

impl FamilyExport {
    fn from_family(family: Family) -> Self {
        let aliases = families::REGISTRATIONS
            .iter()
            .filter(|registration| registration.kind == family)
            .flat_map(|registration| registration.names.iter().copied())
            .filter(|name| *name != family.name())
            .collect();
        Self {
            name: family.name(),
            aliases,
            flags: spectral::Flags::NAMES
                .into_iter()
                .filter(|flag| family.allows(flag))
                .collect(),
            standard: family.is_standard(),
        }
    }
}

/// Every family with its aliases and permitted flags.
#[must_use]
pub fn family_catalog() -> Vec<FamilyExport> {
    Family::ALL.into_iter().map(FamilyExport::from_family).collect()
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    registry: FamilyRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            registry: FamilyRegistry::default(),
        }
    }

    /// Whether the engine has finished its minimal start-up.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Names, aliases and permitted flags of every family.
    ///
    /// # Errors
    /// Only if serialization to a JS value fails.
    #[wasm_bindgen]
    pub fn families(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&family_catalog()).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Compute a family on the requested grid.
    ///
    /// `params` is a plain object such as
    /// `{ field_size: 2, age: 32, min: 390, max: 830, step_size: 1, norm: true }`.
    ///
    /// # Errors
    /// Any parameter or computation error, as a `JsError`.
    #[wasm_bindgen]
    pub fn compute(&self, family: &str, params: JsValue) -> Result<JsValue, JsValue> {
        let map = params_from_js(params)?;
        let output = self.compute_output(family, &map).map_err(to_js_error)?;
        debug_log!("computed {family}");
        serde_wasm_bindgen::to_value(&output).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Companion table on a 0.1 nm grid over the requested bounds.
    ///
    /// # Errors
    /// Any parameter or computation error, as a `JsError`.
    #[wasm_bindgen]
    pub fn compute_plot(&self, family: &str, params: JsValue) -> Result<JsValue, JsValue> {
        let map = params_from_js(params)?;
        let output = self.compute_plot_output(family, &map).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&output).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl Engine {
    /// Typed request for a family name and its untyped parameters.
    ///
    /// # Errors
    /// `UnknownFamily` or any parameter validation error.
    pub fn request(&self, family: &str, params: &ParamMap) -> CmfResult<Representation> {
        let kind = self.registry.resolve(family)?;
        Representation::from_params(kind, params)
    }

    /// # Errors
    /// See [`Engine::request`] and [`Representation::compute`].
    pub fn compute_output(&self, family: &str, params: &ParamMap) -> CmfResult<Output> {
        families::compute_named(&self.registry, family, params)
    }

    /// # Errors
    /// See [`Engine::request`] and [`Representation::compute_plot`].
    pub fn compute_plot_output(&self, family: &str, params: &ParamMap) -> CmfResult<Output> {
        self.request(family, params)?.compute_plot()
    }
}

fn params_from_js(params: JsValue) -> Result<ParamMap, JsValue> {
    if params.is_undefined() || params.is_null() {
        return Ok(ParamMap::new());
    }
    serde_wasm_bindgen::from_value(params).map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::{Engine, family_catalog};
    use crate::families::{ParamMap, ParamValue};
    use crate::spectral::CmfError;

    fn params(entries: &[(&str, ParamValue)]) -> ParamMap {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect()
    }

    #[test]
    fn engine_starts_initialized() {
        assert!(Engine::new().is_initialized());
    }

    #[test]
    fn catalog_lists_every_family_once() {
        let catalog = family_catalog();
        assert_eq!(catalog.len(), 9);
        let lms = catalog.iter().find(|entry| entry.name == "lms").unwrap();
        assert_eq!(lms.flags, vec!["log", "base"]);
        let mb = catalog.iter().find(|entry| entry.name == "lms-mb").unwrap();
        assert!(mb.aliases.contains(&"macleod-boynton"));
        assert!(catalog.iter().filter(|entry| entry.standard).count() == 2);
    }

    #[test]
    fn engine_computes_by_name() {
        let engine = Engine::new();
        let map = params(&[
            ("field_size", 2.0.into()),
            ("age", 32i64.into()),
            ("min", 400.0.into()),
            ("max", 700.0.into()),
            ("step_size", 5.0.into()),
        ]);
        let output = engine.compute_output("LMS", &map).unwrap();
        let table = output.as_table().unwrap();
        assert_eq!(table.table.len(), 61);
    }

    #[test]
    fn engine_reports_unknown_family() {
        let engine = Engine::new();
        let err = engine.compute_output("lmss", &ParamMap::new()).unwrap_err();
        assert!(matches!(err, CmfError::UnknownFamily { .. }));
    }
}
