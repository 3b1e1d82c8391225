//! A2UI Renderer
//!
//! Resolves a component map and a data model into a render tree: propagates a
//! per-node context path, expands template-based lists, and resolves action
//! context on activation. Headless — it produces a `RenderedNode` tree rather
//! than drawing widgets directly, so it can be driven by any presentation
//! layer (or none, for pure logic tests).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::data_model::{compose_path, DataModel};
use super::message::{
    ActionDefinition, Alignment, ChildrenRef, ComponentDefinition, ComponentType, Distribution,
    ImageFit, ImageUsageHint, ListDirection, Orientation, TextFieldType, TextUsageHint,
};
use super::value::StringValue;

/// One resolved action, ready to hand to the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAction {
    pub name: String,
    pub source_component_id: String,
    pub context_path: Option<String>,
    pub context: HashMap<String, Value>,
}

/// A node in the resolved render tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode {
    pub component_id: String,
    pub context_path: Option<String>,
    pub kind: RenderedKind,
}

/// The resolved, displayable shape of one component.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedKind {
    Text {
        value: String,
        usage_hint: TextUsageHint,
    },
    Image {
        url: String,
        fit: ImageFit,
        usage_hint: ImageUsageHint,
    },
    Icon {
        name: String,
        size: Option<f64>,
    },
    Divider {
        orientation: Orientation,
    },
    ColorSwatch {
        color: String,
        size: Option<f64>,
    },
    Column {
        children: Vec<RenderedNode>,
        alignment: Alignment,
        distribution: Distribution,
    },
    Row {
        children: Vec<RenderedNode>,
        alignment: Alignment,
        distribution: Distribution,
    },
    Card {
        child: Box<RenderedNode>,
        elevation: Option<u8>,
    },
    List {
        children: Vec<RenderedNode>,
        direction: ListDirection,
    },
    Button {
        child: Box<RenderedNode>,
        primary: bool,
        /// True when the child resolves to empty text; such a button does
        /// not emit actions on activation either.
        hidden: bool,
        has_action: bool,
    },
    TextField {
        value: String,
        label: Option<String>,
        placeholder: Option<String>,
        text_field_type: TextFieldType,
        binding_path: Option<String>,
    },
    CheckBox {
        checked: bool,
        label: Option<String>,
        binding_path: Option<String>,
        has_action: bool,
    },
    Slider {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
        binding_path: Option<String>,
    },
    MultipleChoice {
        value: String,
        options: Vec<(String, String)>,
        multi_select: bool,
        binding_path: Option<String>,
    },
    Modal {
        visible: bool,
        children: Vec<RenderedNode>,
    },
    Tabs {
        tabs: Vec<(String, String, RenderedNode)>,
        selected: Option<String>,
    },
    /// Rendered in place of a missing child id or an unrecognized component
    /// type; never aborts rendering of siblings.
    Missing {
        reason: String,
    },
}

impl RenderedNode {
    fn is_empty_text(&self) -> bool {
        matches!(&self.kind, RenderedKind::Text { value, .. } if value.is_empty())
    }
}

fn resolve_string(value: &StringValue, context_path: Option<&str>, data_model: &DataModel) -> String {
    match value {
        StringValue::Literal { literal_string } => literal_string.clone(),
        StringValue::Path { path } => data_model
            .get_string(&compose_path(path, context_path))
            .unwrap_or_default(),
    }
}

fn resolve_number(
    value: &super::value::NumberValue,
    context_path: Option<&str>,
    data_model: &DataModel,
) -> f64 {
    use super::value::NumberValue;
    match value {
        NumberValue::Literal { literal_number } => *literal_number,
        NumberValue::Path { path } => data_model
            .get_number(&compose_path(path, context_path))
            .unwrap_or(0.0),
    }
}

fn resolve_bool(
    value: &super::value::BooleanValue,
    context_path: Option<&str>,
    data_model: &DataModel,
) -> bool {
    use super::value::BooleanValue;
    match value {
        BooleanValue::Literal { literal_boolean } => *literal_boolean,
        BooleanValue::Path { path } => data_model
            .get_bool(&compose_path(path, context_path))
            .unwrap_or(false),
    }
}

/// The component adjacency map the renderer resolves against. Owned by the
/// renderer; replaced wholesale on each `SurfaceUpdate` / `BeginRendering`.
#[derive(Debug, Default, Clone)]
pub struct ComponentTree {
    root: Option<String>,
    components: HashMap<String, ComponentDefinition>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn set_root(&mut self, root: impl Into<String>) {
        self.root = Some(root.into());
    }

    /// Insert or replace components by id; does not remove components absent
    /// from `components` (each update is additive over the existing map).
    pub fn set_components(&mut self, components: Vec<ComponentDefinition>) {
        for c in components {
            self.components.insert(c.id.clone(), c);
        }
    }

    pub fn get(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.get(id)
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.components.clear();
    }
}

type ActionHandler = Arc<dyn Fn(ResolvedAction) + Send + Sync>;

/// Resolves a [`ComponentTree`] plus a [`DataModel`] into a [`RenderedNode`]
/// tree and dispatches resolved actions to a configured handler.
#[derive(Clone)]
pub struct Renderer {
    tree: Arc<Mutex<ComponentTree>>,
    action_handler: Arc<Mutex<Option<ActionHandler>>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            tree: Arc::new(Mutex::new(ComponentTree::new())),
            action_handler: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_components(&self, components: Vec<ComponentDefinition>) {
        self.tree.lock().unwrap().set_components(components);
    }

    pub fn set_root(&self, root: impl Into<String>) {
        self.tree.lock().unwrap().set_root(root);
    }

    pub fn root_id(&self) -> Option<String> {
        self.tree.lock().unwrap().root().map(str::to_string)
    }

    pub fn clear(&self) {
        self.tree.lock().unwrap().clear();
    }

    pub fn set_action_handler<F>(&self, handler: F)
    where
        F: Fn(ResolvedAction) + Send + Sync + 'static,
    {
        *self.action_handler.lock().unwrap() = Some(Arc::new(handler));
    }

    /// Render the current tree from its root. `None` if no root is set yet
    /// or the root id is not in the component map (partial-tree resilience:
    /// callers should just retry once the referenced components arrive).
    pub fn render(&self, data_model: &DataModel) -> Option<RenderedNode> {
        let tree = self.tree.lock().unwrap();
        let root = tree.root()?;
        Some(self.render_node(root, None, data_model, &tree))
    }

    fn render_node(
        &self,
        id: &str,
        context_path: Option<&str>,
        data_model: &DataModel,
        tree: &ComponentTree,
    ) -> RenderedNode {
        let Some(def) = tree.get(id) else {
            return RenderedNode {
                component_id: id.to_string(),
                context_path: context_path.map(str::to_string),
                kind: RenderedKind::Missing {
                    reason: format!("component `{id}` not found"),
                },
            };
        };
        let kind = self.render_kind(&def.component, context_path, data_model, tree);
        RenderedNode {
            component_id: id.to_string(),
            context_path: context_path.map(str::to_string),
            kind,
        }
    }

    fn render_kind(
        &self,
        component: &ComponentType,
        context_path: Option<&str>,
        data_model: &DataModel,
        tree: &ComponentTree,
    ) -> RenderedKind {
        match component {
            ComponentType::Text(t) => RenderedKind::Text {
                value: resolve_string(&t.text, context_path, data_model),
                usage_hint: t.usage_hint.unwrap_or_default(),
            },
            ComponentType::Image(img) => RenderedKind::Image {
                url: resolve_string(&img.url, context_path, data_model),
                fit: img.fit.unwrap_or_default(),
                usage_hint: img.usage_hint.unwrap_or_default(),
            },
            ComponentType::Icon(icon) => RenderedKind::Icon {
                name: resolve_string(&icon.name, context_path, data_model),
                size: icon.size,
            },
            ComponentType::Divider(d) => RenderedKind::Divider {
                orientation: d.orientation.unwrap_or_default(),
            },
            ComponentType::ColorSwatch(cs) => RenderedKind::ColorSwatch {
                color: resolve_string(&cs.color, context_path, data_model),
                size: cs.size,
            },
            ComponentType::Column(col) => RenderedKind::Column {
                children: self.render_children(&col.children, context_path, data_model, tree),
                alignment: col.alignment.unwrap_or_default(),
                distribution: col.distribution.unwrap_or_default(),
            },
            ComponentType::Row(row) => RenderedKind::Row {
                children: self.render_children(&row.children, context_path, data_model, tree),
                alignment: row.alignment.unwrap_or_default(),
                distribution: row.distribution.unwrap_or_default(),
            },
            ComponentType::Card(card) => RenderedKind::Card {
                child: Box::new(self.render_node(&card.child, context_path, data_model, tree)),
                elevation: card.elevation,
            },
            ComponentType::List(list) => RenderedKind::List {
                children: self.render_children(&list.children, context_path, data_model, tree),
                direction: list.direction.unwrap_or_default(),
            },
            ComponentType::Button(btn) => {
                let child = self.render_node(&btn.child, context_path, data_model, tree);
                let hidden = child.is_empty_text();
                RenderedKind::Button {
                    child: Box::new(child),
                    primary: btn.primary.unwrap_or(false),
                    hidden,
                    has_action: btn.action.is_some(),
                }
            }
            ComponentType::TextField(tf) => RenderedKind::TextField {
                value: resolve_string(&tf.text, context_path, data_model),
                label: tf
                    .label
                    .as_ref()
                    .map(|l| resolve_string(l, context_path, data_model)),
                placeholder: tf
                    .placeholder
                    .as_ref()
                    .map(|p| resolve_string(p, context_path, data_model)),
                text_field_type: tf.text_field_type,
                binding_path: tf.text.as_path().map(|p| compose_path(p, context_path)),
            },
            ComponentType::CheckBox(cb) => RenderedKind::CheckBox {
                checked: resolve_bool(&cb.value, context_path, data_model),
                label: cb
                    .label
                    .as_ref()
                    .map(|l| resolve_string(l, context_path, data_model)),
                binding_path: cb.value.as_path().map(|p| compose_path(p, context_path)),
                has_action: cb.action.is_some(),
            },
            ComponentType::Slider(s) => RenderedKind::Slider {
                value: resolve_number(&s.value, context_path, data_model),
                min: s.min,
                max: s.max,
                step: s.step,
                binding_path: s.value.as_path().map(|p| compose_path(p, context_path)),
            },
            ComponentType::MultipleChoice(mc) => RenderedKind::MultipleChoice {
                value: resolve_string(&mc.value, context_path, data_model),
                options: mc
                    .options
                    .iter()
                    .map(|o| (o.value.clone(), resolve_string(&o.label, context_path, data_model)))
                    .collect(),
                multi_select: mc.multi_select.unwrap_or(false),
                binding_path: mc.value.as_path().map(|p| compose_path(p, context_path)),
            },
            ComponentType::Modal(m) => RenderedKind::Modal {
                visible: resolve_bool(&m.visible, context_path, data_model),
                children: self.render_children(&m.children, context_path, data_model, tree),
            },
            ComponentType::Tabs(tabs) => RenderedKind::Tabs {
                tabs: tabs
                    .tabs
                    .iter()
                    .map(|t| {
                        (
                            t.id.clone(),
                            resolve_string(&t.label, context_path, data_model),
                            self.render_node(&t.content, context_path, data_model, tree),
                        )
                    })
                    .collect(),
                selected: tabs
                    .selected
                    .as_ref()
                    .map(|s| resolve_string(s, context_path, data_model)),
            },
            ComponentType::Unknown => RenderedKind::Missing {
                reason: "unrecognized component type".to_string(),
            },
        }
    }

    fn render_children(
        &self,
        children: &ChildrenRef,
        context_path: Option<&str>,
        data_model: &DataModel,
        tree: &ComponentTree,
    ) -> Vec<RenderedNode> {
        match children {
            ChildrenRef::ExplicitList(ids) => ids
                .iter()
                .map(|id| self.render_node(id, context_path, data_model, tree))
                .collect(),
            ChildrenRef::Template {
                component_id,
                data_binding,
            } => {
                let base = compose_path(data_binding, context_path);
                data_model
                    .entries(&base)
                    .into_iter()
                    .map(|entry| self.render_node(component_id, Some(&entry.path), data_model, tree))
                    .collect()
            }
        }
    }

    fn resolve_action_context(
        action: &ActionDefinition,
        context_path: Option<&str>,
        data_model: &DataModel,
    ) -> HashMap<String, Value> {
        action
            .context
            .iter()
            .map(|item| {
                let value = data_model
                    .resolve(&item.value, context_path)
                    .unwrap_or(Value::Null);
                (item.key.clone(), value)
            })
            .collect()
    }

    fn dispatch(&self, action: ResolvedAction) {
        if let Some(handler) = self.action_handler.lock().unwrap().clone() {
            handler(action);
        }
    }

    /// Dispatch an action not originating from a component activation, e.g.
    /// a success sub-action synthesized from a server action-response field.
    pub fn dispatch_synthetic(&self, action: ResolvedAction) {
        self.dispatch(action);
    }

    /// Activate a `Button`'s action. Returns `None` (and emits nothing) if
    /// the component isn't a button, carries no action, or is hidden because
    /// its child renders to empty text.
    pub fn activate_button(
        &self,
        component_id: &str,
        context_path: Option<&str>,
        data_model: &DataModel,
    ) -> Option<ResolvedAction> {
        let tree = self.tree.lock().unwrap();
        let def = tree.get(component_id)?;
        let ComponentType::Button(btn) = &def.component else {
            return None;
        };
        let action_def = btn.action.as_ref()?;
        let child = self.render_node(&btn.child, context_path, data_model, &tree);
        if child.is_empty_text() {
            return None;
        }
        let resolved = ResolvedAction {
            name: action_def.name.clone(),
            source_component_id: component_id.to_string(),
            context_path: context_path.map(str::to_string),
            context: Self::resolve_action_context(action_def, context_path, data_model),
        };
        drop(tree);
        self.dispatch(resolved.clone());
        Some(resolved)
    }

    /// Apply a user edit to a `TextField`'s bound path, then fire any
    /// attached action (TextField carries no action in the minimum catalog,
    /// but the write itself is the two-way-binding contract).
    pub fn handle_text_field_edit(
        &self,
        component_id: &str,
        context_path: Option<&str>,
        new_text: &str,
        data_model: &DataModel,
    ) {
        let tree = self.tree.lock().unwrap();
        let Some(def) = tree.get(component_id) else {
            return;
        };
        let ComponentType::TextField(tf) = &def.component else {
            return;
        };
        if let Some(path) = tf.text.as_path() {
            let full = compose_path(path, context_path);
            drop(tree);
            data_model.set(&full, Value::String(new_text.to_string()), true);
        }
    }

    /// Apply a user toggle to a `CheckBox`'s bound path, and fire its action
    /// if one is attached.
    pub fn handle_checkbox_toggle(
        &self,
        component_id: &str,
        context_path: Option<&str>,
        new_value: bool,
        data_model: &DataModel,
    ) -> Option<ResolvedAction> {
        let tree = self.tree.lock().unwrap();
        let def = tree.get(component_id)?;
        let ComponentType::CheckBox(cb) = &def.component else {
            return None;
        };
        if let Some(path) = cb.value.as_path() {
            let full = compose_path(path, context_path);
            data_model.set(&full, Value::Bool(new_value), true);
        }
        let action_def = cb.action.as_ref()?;
        let resolved = ResolvedAction {
            name: action_def.name.clone(),
            source_component_id: component_id.to_string(),
            context_path: context_path.map(str::to_string),
            context: Self::resolve_action_context(action_def, context_path, data_model),
        };
        drop(tree);
        self.dispatch(resolved.clone());
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::message::{
        ActionContextItem, ActionDefinition, ButtonComponent, CardComponent, CheckBoxComponent,
        ColumnComponent, DataContent, DataValue, ListComponent, TextComponent,
    };
    use super::super::value::{BooleanValue, BoundValue};
    use std::sync::{Arc, Mutex};

    fn component(id: &str, ty: ComponentType) -> ComponentDefinition {
        ComponentDefinition {
            id: id.to_string(),
            weight: None,
            component: ty,
        }
    }

    #[test]
    fn s1_hello_render() {
        let renderer = Renderer::new();
        renderer.set_components(vec![component(
            "root",
            ComponentType::Text(TextComponent {
                text: StringValue::literal("hi"),
                usage_hint: None,
            }),
        )]);
        renderer.set_root("root");
        let dm = DataModel::new();
        let node = renderer.render(&dm).unwrap();
        assert_eq!(node.kind, RenderedKind::Text {
            value: "hi".to_string(),
            usage_hint: TextUsageHint::default(),
        });
    }

    #[test]
    fn s2_path_binding_rerenders_on_update() {
        let renderer = Renderer::new();
        renderer.set_components(vec![component(
            "root",
            ComponentType::Text(TextComponent {
                text: StringValue::path("/user/name"),
                usage_hint: None,
            }),
        )]);
        renderer.set_root("root");
        let dm = DataModel::new();
        dm.update("/user", &[DataContent { key: "name".into(), value: DataValue::ValueString("Ada".into()) }]);
        let node = renderer.render(&dm).unwrap();
        assert_eq!(node.kind, RenderedKind::Text { value: "Ada".into(), usage_hint: TextUsageHint::default() });

        dm.update("/user", &[DataContent { key: "name".into(), value: DataValue::ValueString("Grace".into()) }]);
        let node = renderer.render(&dm).unwrap();
        assert_eq!(node.kind, RenderedKind::Text { value: "Grace".into(), usage_hint: TextUsageHint::default() });
    }

    #[test]
    fn s3_template_list_with_replacement() {
        let renderer = Renderer::new();
        renderer.set_components(vec![
            component(
                "row",
                ComponentType::Card(CardComponent {
                    child: "row-text".to_string(),
                    elevation: None,
                }),
            ),
            component(
                "row-text",
                ComponentType::Text(TextComponent {
                    text: StringValue::path("title"),
                    usage_hint: None,
                }),
            ),
            component(
                "list",
                ComponentType::List(ListComponent {
                    children: ChildrenRef::Template {
                        component_id: "row".to_string(),
                        data_binding: "/app/items".to_string(),
                    },
                    direction: None,
                }),
            ),
        ]);
        renderer.set_root("list");

        let dm = DataModel::new();
        dm.update(
            "/app/items",
            &[
                DataContent { key: "a".into(), value: DataValue::ValueMap(vec![DataContent { key: "title".into(), value: DataValue::ValueString("Alpha".into()) }]) },
                DataContent { key: "b".into(), value: DataValue::ValueMap(vec![DataContent { key: "title".into(), value: DataValue::ValueString("Beta".into()) }]) },
            ],
        );

        let node = renderer.render(&dm).unwrap();
        let RenderedKind::List { children, .. } = node.kind else { panic!("expected list") };
        assert_eq!(children.len(), 2);
        let titles: Vec<String> = children
            .iter()
            .map(|c| {
                let RenderedKind::Card { child, .. } = &c.kind else { panic!("expected card") };
                let RenderedKind::Text { value, .. } = &child.kind else { panic!("expected text") };
                value.clone()
            })
            .collect();
        assert_eq!(titles, vec!["Alpha".to_string(), "Beta".to_string()]);

        dm.update(
            "/app",
            &[DataContent {
                key: "items".into(),
                value: DataValue::ValueMap(vec![DataContent {
                    key: "c".into(),
                    value: DataValue::ValueMap(vec![DataContent { key: "title".into(), value: DataValue::ValueString("Gamma".into()) }]),
                }]),
            }],
        );

        let node = renderer.render(&dm).unwrap();
        let RenderedKind::List { children, .. } = node.kind else { panic!("expected list") };
        assert_eq!(children.len(), 1);
        assert!(dm.get("/app/items/a/title").is_none());
        assert!(dm.get("/app/items/b/title").is_none());
    }

    #[test]
    fn button_with_empty_child_is_hidden_and_emits_no_action() {
        let renderer = Renderer::new();
        renderer.set_components(vec![
            component(
                "btn",
                ComponentType::Button(ButtonComponent {
                    child: "label".to_string(),
                    primary: None,
                    action: Some(ActionDefinition { name: "go".into(), context: vec![] }),
                }),
            ),
            component(
                "label",
                ComponentType::Text(TextComponent { text: StringValue::literal(""), usage_hint: None }),
            ),
        ]);
        renderer.set_root("btn");
        let dm = DataModel::new();

        let node = renderer.render(&dm).unwrap();
        let RenderedKind::Button { hidden, .. } = node.kind else { panic!("expected button") };
        assert!(hidden);

        let fired = Arc::new(Mutex::new(false));
        let fired2 = fired.clone();
        renderer.set_action_handler(move |_| *fired2.lock().unwrap() = true);
        let result = renderer.activate_button("btn", None, &dm);
        assert!(result.is_none());
        assert!(!*fired.lock().unwrap());
    }

    #[test]
    fn s5_action_dispatch_resolves_context_from_path() {
        let renderer = Renderer::new();
        renderer.set_components(vec![
            component(
                "btn",
                ComponentType::Button(ButtonComponent {
                    child: "btn-label".to_string(),
                    primary: None,
                    action: Some(ActionDefinition {
                        name: "create".into(),
                        context: vec![ActionContextItem {
                            key: "title".into(),
                            value: BoundValue::path("/form/title"),
                        }],
                    }),
                }),
            ),
            component(
                "btn-label",
                ComponentType::Text(TextComponent { text: StringValue::literal("Go"), usage_hint: None }),
            ),
        ]);
        renderer.set_root("btn");

        let dm = DataModel::new();
        dm.set_string("/form/title", "T", false);

        let captured = Arc::new(Mutex::new(None));
        let captured2 = captured.clone();
        renderer.set_action_handler(move |action| *captured2.lock().unwrap() = Some(action));

        let resolved = renderer.activate_button("btn", None, &dm).unwrap();
        assert_eq!(resolved.name, "create");
        assert_eq!(resolved.source_component_id, "btn");
        assert_eq!(resolved.context.get("title"), Some(&Value::String("T".to_string())));
        assert_eq!(*captured.lock().unwrap(), Some(resolved));
    }

    #[test]
    fn template_scoped_action_context_resolves_relative_to_entry() {
        let renderer = Renderer::new();
        renderer.set_components(vec![component(
            "row-btn",
            ComponentType::Button(ButtonComponent {
                child: "label".to_string(),
                primary: None,
                action: Some(ActionDefinition {
                    name: "select".into(),
                    context: vec![ActionContextItem {
                        key: "title".into(),
                        value: BoundValue::path("title"),
                    }],
                }),
            }),
        ), component("label", ComponentType::Text(TextComponent { text: StringValue::literal("x"), usage_hint: None }))]);
        renderer.set_root("row-btn");

        let dm = DataModel::new();
        dm.set_string("/app/items/a/title", "Alpha", false);

        let resolved = renderer
            .activate_button("row-btn", Some("/app/items/a"), &dm)
            .unwrap();
        assert_eq!(resolved.context.get("title"), Some(&Value::String("Alpha".to_string())));
    }

    #[test]
    fn missing_child_renders_diagnostic_placeholder_without_panicking() {
        let renderer = Renderer::new();
        renderer.set_components(vec![component(
            "root",
            ComponentType::Column(ColumnComponent {
                children: ChildrenRef::ExplicitList(vec!["ghost".to_string()]),
                alignment: None,
                distribution: None,
            }),
        )]);
        renderer.set_root("root");
        let dm = DataModel::new();
        let node = renderer.render(&dm).unwrap();
        let RenderedKind::Column { children, .. } = node.kind else { panic!("expected column") };
        assert_eq!(children.len(), 1);
        assert!(matches!(&children[0].kind, RenderedKind::Missing { .. }));
    }

    #[test]
    fn unrecognized_component_type_renders_diagnostic_placeholder() {
        let renderer = Renderer::new();
        renderer.set_components(vec![component("root", ComponentType::Unknown)]);
        renderer.set_root("root");
        let dm = DataModel::new();
        let node = renderer.render(&dm).unwrap();
        assert!(matches!(node.kind, RenderedKind::Missing { .. }));
    }

    #[test]
    fn checkbox_toggle_marks_bound_path_dirty() {
        let renderer = Renderer::new();
        renderer.set_components(vec![component(
            "cb",
            ComponentType::CheckBox(CheckBoxComponent {
                value: BooleanValue::path("/form/agree"),
                label: None,
                action: None,
            }),
        )]);
        renderer.set_root("cb");
        let dm = DataModel::new();
        renderer.handle_checkbox_toggle("cb", None, true, &dm);
        assert_eq!(dm.get_bool("/form/agree"), Some(true));
        assert!(dm.is_dirty("/form/agree"));
    }

    #[test]
    fn checkbox_toggle_fires_attached_action() {
        let renderer = Renderer::new();
        renderer.set_components(vec![component(
            "cb",
            ComponentType::CheckBox(CheckBoxComponent {
                value: BooleanValue::path("/form/agree"),
                label: None,
                action: Some(ActionDefinition { name: "agree_changed".into(), context: vec![] }),
            }),
        )]);
        renderer.set_root("cb");
        let dm = DataModel::new();

        let captured = Arc::new(Mutex::new(None));
        let captured2 = captured.clone();
        renderer.set_action_handler(move |action| *captured2.lock().unwrap() = Some(action));

        let resolved = renderer.handle_checkbox_toggle("cb", None, true, &dm).unwrap();
        assert_eq!(resolved.name, "agree_changed");
        assert_eq!(dm.get_bool("/form/agree"), Some(true));
        assert_eq!(*captured.lock().unwrap(), Some(resolved));
    }

    #[test]
    fn text_field_carries_field_type_through_render() {
        use super::super::message::TextFieldComponent;

        let renderer = Renderer::new();
        renderer.set_components(vec![component(
            "notes",
            ComponentType::TextField(TextFieldComponent {
                text: StringValue::path("/form/notes"),
                label: None,
                placeholder: None,
                text_field_type: TextFieldType::Multiline,
            }),
        )]);
        renderer.set_root("notes");
        let dm = DataModel::new();

        let node = renderer.render(&dm).unwrap();
        let RenderedKind::TextField { text_field_type, .. } = node.kind else {
            panic!("expected text field")
        };
        assert_eq!(text_field_type, TextFieldType::Multiline);
    }

    #[test]
    fn text_usage_hint_label_round_trips_through_render() {
        let renderer = Renderer::new();
        renderer.set_components(vec![component(
            "caption",
            ComponentType::Text(TextComponent {
                text: StringValue::literal("Name"),
                usage_hint: Some(TextUsageHint::Label),
            }),
        )]);
        renderer.set_root("caption");
        let dm = DataModel::new();

        let node = renderer.render(&dm).unwrap();
        assert_eq!(
            node.kind,
            RenderedKind::Text { value: "Name".to_string(), usage_hint: TextUsageHint::Label }
        );
    }

    #[test]
    fn render_without_root_returns_none() {
        let renderer = Renderer::new();
        let dm = DataModel::new();
        assert!(renderer.render(&dm).is_none());
    }
}
