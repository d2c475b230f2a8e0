//! Stage 5: Registry planning
//!
//! Derives three declarative update-plan records describing how the host
//! application should be edited to expose a newly generated widget. The
//! plans are persisted for later manual or tooled application; the core
//! never mutates the host project's files.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::generation::types::{RegistryUpdatePlan, RegistryUpdatePlans, UpdateChange};
use crate::store::KeyValueStore;

/// Key prefixes under which update plans are persisted, one per plan kind
pub const WIDGET_PLAN_KEY_PREFIX: &str = "widget_update_plan_";
pub const TYPES_PLAN_KEY_PREFIX: &str = "types_update_plan_";
pub const LIBRARY_PLAN_KEY_PREFIX: &str = "library_update_plan_";

/// Host files the plans target
const CONTAINER_FILE: &str = "src/components/WidgetContainer.tsx";
const TYPES_FILE: &str = "src/types/widget.ts";
const LIBRARY_FILE: &str = "src/data/widgetLibrary.ts";

const DEFAULT_CATEGORY: &str = "Custom";
const DEFAULT_ICON: &str = "Sparkles";

/// Records declarative registry update plans for generated widgets
pub struct RegistryPlanner {
    store: Arc<dyn KeyValueStore>,
}

impl RegistryPlanner {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Derive and persist the three update plans for one widget.
    ///
    /// Pure derivation from `widget_type` and `widget_title`; independent
    /// of whether any file for the widget passed validation.
    pub fn plan_registration(
        &self,
        widget_type: &str,
        widget_title: &str,
    ) -> Result<RegistryUpdatePlans> {
        let plans = derive_plans(widget_type, widget_title);

        self.persist(WIDGET_PLAN_KEY_PREFIX, widget_type, &plans.widget)?;
        self.persist(TYPES_PLAN_KEY_PREFIX, widget_type, &plans.types)?;
        self.persist(LIBRARY_PLAN_KEY_PREFIX, widget_type, &plans.library)?;

        Ok(plans)
    }

    fn persist(&self, prefix: &str, widget_type: &str, plan: &RegistryUpdatePlan) -> Result<()> {
        let key = format!("{}{}", prefix, widget_type);
        let json = serde_json::to_string(plan)
            .with_context(|| format!("Failed to serialize update plan {}", key))?;
        self.store
            .set(&key, &json)
            .with_context(|| format!("Failed to persist update plan {}", key))
    }
}

fn derive_plans(widget_type: &str, widget_title: &str) -> RegistryUpdatePlans {
    let component = format!("{}Widget", pascal_case(widget_type));

    let widget = RegistryUpdatePlan {
        file: CONTAINER_FILE.to_string(),
        changes: vec![
            UpdateChange::AddImport {
                import: format!("import {} from './widgets/{}';", component, component),
            },
            UpdateChange::AddDispatchCase {
                case: format!(
                    "case '{}':\n  return <{} {{...widgetProps}} />;",
                    widget_type, component
                ),
            },
        ],
    };

    let types = RegistryUpdatePlan {
        file: TYPES_FILE.to_string(),
        changes: vec![UpdateChange::AddUnionMember {
            literal: widget_type.to_string(),
        }],
    };

    let library = RegistryUpdatePlan {
        file: LIBRARY_FILE.to_string(),
        changes: vec![UpdateChange::AddLibraryEntry {
            widget_type: widget_type.to_string(),
            title: widget_title.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            icon: DEFAULT_ICON.to_string(),
        }],
    };

    RegistryUpdatePlans {
        widget,
        types,
        library,
    }
}

/// `moving-average-chart` -> `MovingAverageChart`
fn pascal_case(identifier: &str) -> String {
    identifier
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
