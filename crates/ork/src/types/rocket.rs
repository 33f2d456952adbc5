use super::{ComponentKind, FlightConfigurationSet, RocketComponent};

/// Handle of a component inside a [`Rocket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentIndex(usize);

#[derive(Debug, Clone)]
struct Node {
    component: RocketComponent,
    parent: Option<ComponentIndex>,
    children: Vec<ComponentIndex>,
}

/// The design tree.
///
/// Components live in an arena and are only added as children of existing
/// components, so every component is reachable from the root and the tree
/// has no cycles.
#[derive(Debug, Clone)]
pub struct Rocket {
    nodes: Vec<Node>,
    configurations: FlightConfigurationSet,
}

impl Default for Rocket {
    fn default() -> Self {
        Self::new()
    }
}

impl Rocket {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                component: RocketComponent::new(ComponentKind::Rocket),
                parent: None,
                children: Vec::new(),
            }],
            configurations: FlightConfigurationSet::default(),
        }
    }

    pub fn root(&self) -> ComponentIndex {
        ComponentIndex(0)
    }

    pub fn component(&self, index: ComponentIndex) -> &RocketComponent {
        &self.nodes[index.0].component
    }

    pub fn component_mut(&mut self, index: ComponentIndex) -> &mut RocketComponent {
        &mut self.nodes[index.0].component
    }

    /// Append `component` as the last child of `parent`.
    pub fn add_child(&mut self, parent: ComponentIndex, component: RocketComponent) -> ComponentIndex {
        let index = ComponentIndex(self.nodes.len());
        self.nodes.push(Node {
            component,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(index);
        index
    }

    pub fn parent(&self, index: ComponentIndex) -> Option<ComponentIndex> {
        self.nodes[index.0].parent
    }

    pub fn children(&self, index: ComponentIndex) -> &[ComponentIndex] {
        &self.nodes[index.0].children
    }

    /// Number of components, the rocket itself included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// All components in depth-first pre-order, starting with the rocket.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentIndex, &RocketComponent)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.children(index).iter().rev());
        }
        order.into_iter().map(|index| (index, self.component(index)))
    }

    /// Mutable access to every component, in arena order.
    pub fn components_mut(&mut self) -> impl Iterator<Item = &mut RocketComponent> {
        self.nodes.iter_mut().map(|node| &mut node.component)
    }

    pub fn find_by_id(&self, id: &str) -> Option<ComponentIndex> {
        self.iter()
            .find(|(_, component)| component.id.as_str() == id)
            .map(|(index, _)| index)
    }

    /// Stages in tree order; a stage's number is its position in this list.
    pub fn stages(&self) -> Vec<ComponentIndex> {
        self.iter()
            .filter(|(_, component)| component.kind().is_stage())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn stage_count(&self) -> u32 {
        self.stages().len() as u32
    }

    pub fn configurations(&self) -> &FlightConfigurationSet {
        &self.configurations
    }

    pub fn configurations_mut(&mut self) -> &mut FlightConfigurationSet {
        &mut self.configurations
    }
}
