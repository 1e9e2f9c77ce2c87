use super::object::{ViewLayer, ViewObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightType {
    Build,
    RectSelection,
    Fog,
    PoisonGas,
    Memory,
    Night,
    Efficiency,
}

impl HighlightType {
    pub const COUNT: usize = 7;
    pub const ALL: [HighlightType; HighlightType::COUNT] = [
        HighlightType::Build,
        HighlightType::RectSelection,
        HighlightType::Fog,
        HighlightType::PoisonGas,
        HighlightType::Memory,
        HighlightType::Night,
        HighlightType::Efficiency,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewIndex {
    objects: [Option<ViewObject>; ViewLayer::COUNT],
    highlights: [f64; HighlightType::COUNT],
}

impl ViewIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: ViewObject) -> Option<ViewObject> {
        let slot = &mut self.objects[object.layer().index()];
        slot.replace(object)
    }

    pub fn with_object(mut self, object: ViewObject) -> Self {
        self.insert(object);
        self
    }

    pub fn remove_object(&mut self, layer: ViewLayer) -> Option<ViewObject> {
        self.objects[layer.index()].take()
    }

    pub fn has_object(&self, layer: ViewLayer) -> bool {
        self.objects[layer.index()].is_some()
    }

    pub fn object(&self, layer: ViewLayer) -> Option<&ViewObject> {
        self.objects[layer.index()].as_ref()
    }

    pub fn top_object(&self, layers: &[ViewLayer]) -> Option<&ViewObject> {
        layers.iter().rev().find_map(|layer| self.object(*layer))
    }

    pub fn is_empty(&self) -> bool {
        self.objects.iter().all(Option::is_none)
    }

    pub fn set_highlight(&mut self, highlight: HighlightType, amount: f64) {
        let amount = if amount.is_nan() {
            0.0
        } else {
            amount.clamp(0.0, 1.0)
        };
        self.highlights[highlight.index()] = amount;
    }

    pub fn clear_highlight(&mut self, highlight: HighlightType) {
        self.highlights[highlight.index()] = 0.0;
    }

    pub fn highlight(&self, highlight: HighlightType) -> f64 {
        self.highlights[highlight.index()]
    }

    pub fn highlights(&self) -> impl Iterator<Item = (HighlightType, f64)> + '_ {
        HighlightType::ALL
            .into_iter()
            .map(|highlight| (highlight, self.highlight(highlight)))
            .filter(|(_, amount)| *amount > 0.0)
    }
}
