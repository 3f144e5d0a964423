//! Ordered tab container.

/// Stable tab identity. Never reused, so events from a closed tab can't be
/// attributed to a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabId(u64);

impl TabId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for TabId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

#[derive(Debug)]
pub struct Tab<V> {
    pub id: TabId,
    pub view: V,
    pub label: String,
    pub url: String,
    /// Last page title reported by the engine; empty until one arrives.
    pub title: String,
}

#[derive(Debug)]
pub enum CloseOutcome<V> {
    Closed(Tab<V>),
    /// The tab was the last one; it stays open and the window should close.
    CloseWindow,
    NoSuchTab,
}

#[derive(Debug)]
pub struct TabStrip<V> {
    tabs: Vec<Tab<V>>,
    active: Option<usize>,
    next_id: u64,
}

impl<V> Default for TabStrip<V> {
    fn default() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 1,
        }
    }
}

impl<V> TabStrip<V> {
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn reserve_id(&mut self) -> TabId {
        let id = TabId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Appends a tab under an id from [`Self::reserve_id`]. The first tab is
    /// always activated.
    pub fn insert(&mut self, id: TabId, view: V, url: String, label: String, switch: bool) -> usize {
        self.tabs.push(Tab {
            id,
            view,
            label,
            url,
            title: String::new(),
        });
        let index = self.tabs.len() - 1;
        if switch || self.active.is_none() {
            self.active = Some(index);
        }
        index
    }

    pub fn open(&mut self, view: V, url: String, label: String, switch: bool) -> TabId {
        let id = self.reserve_id();
        self.insert(id, view, url, label, switch);
        id
    }

    pub fn close(&mut self, index: usize) -> CloseOutcome<V> {
        if index >= self.tabs.len() {
            return CloseOutcome::NoSuchTab;
        }
        if self.tabs.len() == 1 {
            return CloseOutcome::CloseWindow;
        }

        let removed = self.tabs.remove(index);
        self.active = match self.active {
            Some(active) if active > index => Some(active - 1),
            Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
            other => other,
        };
        CloseOutcome::Closed(removed)
    }

    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Moves the tab at `from` to position `to`; the active tab stays the
    /// same tab.
    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tabs.len() || to >= self.tabs.len() {
            return false;
        }
        if from == to {
            return true;
        }

        let active_id = self.active_id();
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
        self.active = active_id.and_then(|id| self.index_of(id));
        true
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Tab<V>> {
        self.active.and_then(|index| self.tabs.get(index))
    }

    pub fn active_mut(&mut self) -> Option<&mut Tab<V>> {
        self.active.and_then(|index| self.tabs.get_mut(index))
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active().map(|tab| tab.id)
    }

    pub fn is_active(&self, id: TabId) -> bool {
        self.active_id() == Some(id)
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    pub fn get(&self, id: TabId) -> Option<&Tab<V>> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab<V>> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Tab<V>> {
        self.tabs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab<V>> {
        self.tabs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tab<V>> {
        self.tabs.iter_mut()
    }
}
