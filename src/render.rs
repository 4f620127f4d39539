use serde::{Deserialize, Serialize};
use tracing::info;

use crate::action::{ActionAlias, ActionAliasError};
use crate::graph::{IntermediateNode, build_intermediate_tree};
use crate::label::{GlyphMetrics, LetterAspectMetrics, trim_label};
use crate::plan::ChangeRecord;

pub const COLOR_DARK_GREY: &str = "#6c757d";
pub const COLOR_GREEN: &str = "#5eb95e";
pub const COLOR_RED: &str = "#dd514c";
pub const COLOR_YELLOW: &str = "#fad232";
pub const COLOR_WHITE: &str = "#ffffff";

pub const LABEL_FONT_SIZE: f64 = 14.0;
pub const LABEL_MAX_WIDTH: f64 = 100.0;
pub const LABEL_CONTAINER_WIDTH: f64 = 120.0;
pub const BOX_RADIUS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    pub font_size: f64,
    pub max_width: f64,
    pub container_width: f64,
}

impl LabelLayout {
    pub fn padding(&self) -> f64 {
        self.container_width - self.max_width
    }
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            font_size: LABEL_FONT_SIZE,
            max_width: LABEL_MAX_WIDTH,
            container_width: LABEL_CONTAINER_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub fill: String,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub style: LabelStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    pub width: f64,
    pub fill: String,
    pub stroke: String,
    pub radius: f64,
}

/// Node shape consumed by the graph view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub children: Vec<RenderNode>,
    pub label_cfg: LabelConfig,
    pub style: BoxStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ChangeRecord>,
}

impl RenderNode {
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(RenderNode::node_count)
            .sum::<usize>()
    }

    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Fill and stroke colour for a changed resource; `None` keeps the base style.
pub fn action_color(alias: ActionAlias) -> Option<&'static str> {
    match alias {
        ActionAlias::NoOp => None,
        ActionAlias::Create => Some(COLOR_GREEN),
        ActionAlias::Delete => Some(COLOR_RED),
        ActionAlias::Update | ActionAlias::CreateDelete | ActionAlias::DeleteCreate => {
            Some(COLOR_YELLOW)
        }
    }
}

pub fn graph_data_from_changes(changes: &[ChangeRecord]) -> Result<RenderNode, ActionAliasError> {
    let tree = build_intermediate_tree(changes)?;
    let graph = render_graph_data(&tree)?;
    info!(
        change_count = changes.len(),
        node_count = graph.node_count(),
        resource_count = tree.resource_count(),
        "converted changes into graph data"
    );
    Ok(graph)
}

pub fn render_graph_data(tree: &IntermediateNode) -> Result<RenderNode, ActionAliasError> {
    render_graph_data_with(tree, &LabelLayout::default(), &LetterAspectMetrics)
}

pub fn render_graph_data_with(
    tree: &IntermediateNode,
    layout: &LabelLayout,
    metrics: &dyn GlyphMetrics,
) -> Result<RenderNode, ActionAliasError> {
    let label = trim_label(&tree.label, layout.font_size, layout.max_width, metrics);

    let mut style = BoxStyle {
        width: label.width + layout.padding(),
        fill: COLOR_DARK_GREY.to_owned(),
        stroke: COLOR_DARK_GREY.to_owned(),
        radius: BOX_RADIUS,
    };

    if let Some(resource) = &tree.resource
        && let Some(color) = action_color(resource.action_alias()?)
    {
        style.fill = color.to_owned();
        style.stroke = color.to_owned();
    }

    let children = tree
        .children
        .values()
        .map(|child| render_graph_data_with(child, layout, metrics))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RenderNode {
        id: tree.id.clone(),
        label: label.text,
        children,
        label_cfg: LabelConfig {
            style: LabelStyle {
                fill: COLOR_WHITE.to_owned(),
                font_size: layout.font_size,
            },
        },
        style,
        resource: tree.resource.clone(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::action::ALL_ACTION_ALIASES;
    use crate::action::ActionAlias;
    use crate::graph::{IntermediateNode, build_intermediate_tree};
    use crate::plan::{Action, ChangeRecord};

    use super::{
        COLOR_DARK_GREY, COLOR_GREEN, COLOR_RED, COLOR_WHITE, COLOR_YELLOW, LabelLayout,
        action_color, graph_data_from_changes, render_graph_data, render_graph_data_with,
    };

    fn fixed_ten(_: char, _: f64) -> f64 {
        10.0
    }

    #[test]
    fn create_example_colors_only_the_resource_node() {
        let graph = graph_data_from_changes(&[ChangeRecord::new(
            "aws_instance.web",
            vec![Action::Create],
        )])
        .expect("conversion should succeed");

        assert_eq!(graph.id, "root");
        assert_eq!(graph.style.fill, COLOR_DARK_GREY);
        assert!(graph.resource.is_none());

        let instance = graph
            .find("root.aws_instance")
            .expect("type node should exist");
        assert_eq!(instance.style.fill, COLOR_DARK_GREY);
        assert_eq!(instance.style.stroke, COLOR_DARK_GREY);

        let web = graph
            .find("root.aws_instance.web")
            .expect("resource node should exist");
        assert_eq!(web.label, "web");
        assert_eq!(web.style.fill, COLOR_GREEN);
        assert_eq!(web.style.stroke, COLOR_GREEN);
        assert!(web.resource.is_some());
        assert!(web.children.is_empty());
    }

    #[test]
    fn color_table_covers_every_alias() {
        let colors = ALL_ACTION_ALIASES
            .iter()
            .map(|alias| (*alias, action_color(*alias)))
            .collect::<Vec<_>>();

        assert_eq!(
            colors,
            vec![
                (ActionAlias::NoOp, None),
                (ActionAlias::Create, Some(COLOR_GREEN)),
                (ActionAlias::Delete, Some(COLOR_RED)),
                (ActionAlias::Update, Some(COLOR_YELLOW)),
                (ActionAlias::CreateDelete, Some(COLOR_YELLOW)),
                (ActionAlias::DeleteCreate, Some(COLOR_YELLOW)),
            ]
        );
    }

    #[test]
    fn each_action_shape_styles_its_node() {
        let cases = [
            (vec![Action::Create], COLOR_GREEN),
            (vec![Action::Delete], COLOR_RED),
            (vec![Action::Update], COLOR_YELLOW),
            (vec![Action::Create, Action::Delete], COLOR_YELLOW),
            (vec![Action::Delete, Action::Create], COLOR_YELLOW),
        ];

        for (actions, expected) in cases {
            let graph = graph_data_from_changes(&[ChangeRecord::new("res.x", actions.clone())])
                .expect("conversion should succeed");
            let node = graph.find("root.res.x").expect("node should exist");
            assert_eq!(node.style.fill, expected, "actions {actions:?}");
            assert_eq!(node.style.stroke, expected, "actions {actions:?}");
        }
    }

    #[test]
    fn base_style_and_box_width_follow_layout() {
        let tree = build_intermediate_tree(&[ChangeRecord::new("abc", vec![Action::Update])])
            .expect("tree build should succeed");
        let graph = render_graph_data_with(&tree, &LabelLayout::default(), &fixed_ten)
            .expect("render should succeed");

        assert_eq!(graph.label, "root");
        assert_eq!(graph.style.width, 40.0 + 20.0);
        assert_eq!(graph.style.radius, 4.0);
        assert_eq!(graph.label_cfg.style.fill, COLOR_WHITE);
        assert_eq!(graph.label_cfg.style.font_size, 14.0);

        let node = &graph.children[0];
        assert_eq!(node.style.width, 30.0 + 20.0);
    }

    #[test]
    fn long_labels_are_trimmed_and_box_uses_trimmed_width() {
        let tree = build_intermediate_tree(&[ChangeRecord::new(
            "a_really_long_segment_name",
            vec![Action::Create],
        )])
        .expect("tree build should succeed");
        let layout = LabelLayout {
            font_size: 12.0,
            max_width: 55.0,
            container_width: 75.0,
        };
        let graph = render_graph_data_with(&tree, &layout, &fixed_ten).expect("render");

        let node = &graph.children[0];
        assert_eq!(node.id, "root.a_really_long_segment_name");
        assert_eq!(node.label, "a_rea...");
        assert_eq!(node.style.width, 50.0 + 20.0);
        assert_eq!(node.label_cfg.style.font_size, 12.0);
    }

    #[test]
    fn render_is_isomorphic_to_the_tree() {
        let tree = build_intermediate_tree(&[
            ChangeRecord::new("module.app.aws_instance.web", vec![Action::Create]),
            ChangeRecord::new("module.app.aws_instance.db", vec![Action::Delete]),
            ChangeRecord::new("aws_s3_bucket.logs", vec![Action::Update]),
        ])
        .expect("tree build should succeed");
        let graph = render_graph_data(&tree).expect("render should succeed");

        assert_eq!(graph.node_count(), tree.node_count());
        assert_matches_tree(&graph, &tree);
    }

    fn assert_matches_tree(graph: &super::RenderNode, tree: &IntermediateNode) {
        assert_eq!(graph.id, tree.id);
        assert_eq!(graph.resource, tree.resource);
        assert_eq!(graph.children.len(), tree.children.len());
        for (rendered, source) in graph.children.iter().zip(tree.children.values()) {
            assert_matches_tree(rendered, source);
        }
    }

    #[test]
    fn interior_resource_node_uses_its_action_color() {
        let graph = graph_data_from_changes(&[
            ChangeRecord::new("module.app", vec![Action::Delete]),
            ChangeRecord::new("module.app.aws_instance.web", vec![Action::Create]),
        ])
        .expect("conversion should succeed");

        let app = graph.find("root.module.app").expect("module node should exist");
        assert_eq!(app.children.len(), 1);
        assert_eq!(app.style.fill, COLOR_RED);
        assert_eq!(app.style.stroke, COLOR_RED);

        let module = graph.find("root.module").expect("prefix node should exist");
        assert_eq!(module.style.fill, COLOR_DARK_GREY);

        let web = graph
            .find("root.module.app.aws_instance.web")
            .expect("leaf node should exist");
        assert_eq!(web.style.fill, COLOR_GREEN);
    }

    #[test]
    fn unrecognized_resource_actions_propagate() {
        let mut tree = IntermediateNode::root();
        tree.resource = Some(ChangeRecord::new("root", vec![Action::Read]));

        assert!(render_graph_data(&tree).is_err());
    }

    #[test]
    fn render_node_serializes_in_graph_view_shape() {
        let graph =
            render_graph_data_with(&IntermediateNode::root(), &LabelLayout::default(), &fixed_ten)
                .expect("render should succeed");
        let encoded = serde_json::to_value(&graph).expect("graph should encode");

        assert_eq!(
            encoded,
            json!({
                "id": "root",
                "label": "root",
                "children": [],
                "labelCfg": {"style": {"fill": "#ffffff", "fontSize": 14.0}},
                "style": {"width": 60.0, "fill": "#6c757d", "stroke": "#6c757d", "radius": 4.0}
            })
        );
    }
}
