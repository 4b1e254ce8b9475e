//! Render dispatch: full redraws after every sync, cheap amount updates on
//! every tick.
//!
//! How entities turn into visible nodes is up to the injected [`View`]; the
//! dispatcher only decides what gets (re)rendered and when.

use std::rc::Rc;

use crate::clock::Clock;
use crate::extrapolate::{displayed_amount, elapsed_seconds};
use crate::snapshot::{Building, EntityKind, Resource, Snapshot, Upgrade};
use crate::store::GameStore;

/// One display container per entity category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Resources,
    Buildings,
    Upgrades,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Resources, Region::Buildings, Region::Upgrades];

    pub fn of(kind: EntityKind) -> Region {
        match kind {
            EntityKind::Resource => Region::Resources,
            EntityKind::Building => Region::Buildings,
            EntityKind::Upgrade => Region::Upgrades,
        }
    }
}

impl EntityKind {
    /// Name of the template used to render this kind of entity.
    pub fn template_name(self) -> &'static str {
        match self {
            EntityKind::Resource => "resource",
            EntityKind::Building => "building",
            EntityKind::Upgrade => "upgrade",
        }
    }
}

/// Data handed to the render function for one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntityData<'a> {
    Resource {
        resource: &'a Resource,
        /// Amount to show right now; equals `owned` on a full redraw.
        displayed: f64,
    },
    Building(&'a Building),
    Upgrade(&'a Upgrade),
}

impl<'a> EntityData<'a> {
    pub fn kind(&self) -> EntityKind {
        match *self {
            EntityData::Resource { .. } => EntityKind::Resource,
            EntityData::Building(_) => EntityKind::Building,
            EntityData::Upgrade(_) => EntityKind::Upgrade,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            EntityData::Resource { resource, .. } => &resource.name,
            EntityData::Building(b) => &b.name,
            EntityData::Upgrade(u) => &u.name,
        }
    }
}

/// The presentation collaborator.
pub trait View {
    /// A rendered entity, ready to be appended to a region.
    type Node;
    /// Identifies an appended node so its amount can be updated in place.
    type Handle: Clone;

    fn render(&mut self, entity: &EntityData<'_>, template: &str) -> Self::Node;

    /// Remove every node from `region`.
    fn clear(&mut self, region: Region);

    fn append(&mut self, region: Region, node: Self::Node) -> Self::Handle;

    /// Replace only the displayed amount of a rendered resource.
    fn set_displayed(&mut self, handle: &Self::Handle, amount: f64);
}

struct Rendered<H> {
    snapshot: Rc<Snapshot>,
    /// Handles of resource nodes, in snapshot order.
    resources: Vec<H>,
}

pub struct RenderDispatcher<V: View> {
    view: V,
    store: Rc<GameStore>,
    clock: Rc<dyn Clock>,
    rendered: Option<Rendered<V::Handle>>,
}

impl<V: View> RenderDispatcher<V> {
    pub fn new(view: V, store: Rc<GameStore>, clock: Rc<dyn Clock>) -> Self {
        Self {
            view,
            store,
            clock,
            rendered: None,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Rebuild every region from the current snapshot. Returns false (and
    /// touches nothing) while the store is uninitialized.
    pub fn full_redraw(&mut self) -> bool {
        let Ok(snapshot) = self.store.current_snapshot() else {
            return false;
        };

        for region in Region::ALL {
            self.view.clear(region);
        }

        let mut resources = Vec::with_capacity(snapshot.resources().len());
        for resource in snapshot.resources() {
            let entity = EntityData::Resource {
                resource,
                displayed: resource.owned,
            };
            resources.push(self.draw(&entity));
        }
        for building in snapshot.buildings() {
            self.draw(&EntityData::Building(building));
        }
        for upgrade in snapshot.upgrades() {
            self.draw(&EntityData::Upgrade(upgrade));
        }

        self.rendered = Some(Rendered {
            snapshot,
            resources,
        });
        true
    }

    fn draw(&mut self, entity: &EntityData<'_>) -> V::Handle {
        let kind = entity.kind();
        let node = self.view.render(entity, kind.template_name());
        self.view.append(Region::of(kind), node)
    }

    /// Refresh the displayed amount of every rendered resource. Returns how
    /// many amounts were updated; 0 while nothing has been synced.
    pub fn tick(&mut self) -> usize {
        if !self.store.is_initialized() {
            log::debug!("tick skipped: no snapshot yet");
            return 0;
        }
        let Some(rendered) = &self.rendered else {
            return 0;
        };

        let elapsed = elapsed_seconds(&rendered.snapshot, self.clock.now());
        for (resource, handle) in rendered.snapshot.resources().iter().zip(&rendered.resources) {
            self.view
                .set_displayed(handle, displayed_amount(resource, elapsed));
        }
        rendered.resources.len()
    }
}
