use std::any::TypeId;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{Event, EventHandler};

struct Group {
    kind: TypeId,
    name: &'static str,
    handlers: Vec<Weak<dyn EventHandler>>,
}

/// Non-owning, type-grouped event fan-out.
///
/// Subscribers are held as `Weak` references grouped by their concrete
/// type. Groups are visited in the order their first member subscribed;
/// members within a group in subscription order. A handler whose owner
/// has been dropped is skipped and pruned on the next subscription change.
#[derive(Default)]
pub struct EventDispatcher {
    groups: RefCell<Vec<Group>>,
}

fn same_handler(weak: &Weak<dyn EventHandler>, ptr: *const ()) -> bool {
    std::ptr::addr_eq(weak.as_ptr(), ptr)
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handler` without taking ownership. Subscribing the same
    /// instance twice is a no-op.
    pub fn subscribe<H: EventHandler + 'static>(&self, handler: &Rc<H>) {
        let ptr = Rc::as_ptr(handler) as *const ();
        let kind = TypeId::of::<H>();
        let mut groups = self.groups.borrow_mut();
        prune(&mut groups);

        let weak: Weak<dyn EventHandler> = Rc::downgrade(handler) as Weak<dyn EventHandler>;
        match groups.iter_mut().find(|g| g.kind == kind) {
            Some(group) => {
                if group.handlers.iter().any(|w| same_handler(w, ptr)) {
                    return;
                }
                group.handlers.push(weak);
            }
            None => groups.push(Group {
                kind,
                name: std::any::type_name::<H>(),
                handlers: vec![weak],
            }),
        }
        log::debug!("subscribed {}", std::any::type_name::<H>());
    }

    /// Removes `handler`. Returns false if it was not subscribed.
    pub fn unsubscribe<H: EventHandler + 'static>(&self, handler: &Rc<H>) -> bool {
        let ptr = Rc::as_ptr(handler) as *const ();
        let kind = TypeId::of::<H>();
        let mut groups = self.groups.borrow_mut();

        let Some(group) = groups.iter_mut().find(|g| g.kind == kind) else {
            return false;
        };
        let before = group.handlers.len();
        group.handlers.retain(|w| !same_handler(w, ptr));
        let removed = group.handlers.len() != before;

        prune(&mut groups);
        if removed {
            log::debug!("unsubscribed {}", std::any::type_name::<H>());
        }
        removed
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.groups
            .borrow()
            .iter()
            .flat_map(|g| g.handlers.iter())
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to each live subscriber in order, awaiting each one,
    /// until a handler marks it handled.
    ///
    /// Works on a snapshot of the subscriber list, so handlers may subscribe
    /// or unsubscribe while the dispatch is in flight: removed handlers that
    /// have not run yet are skipped, new ones only see later events.
    /// Returns whether the event ended up handled.
    pub async fn dispatch(&self, event: &mut Event) -> bool {
        let snapshot: Vec<(&'static str, Weak<dyn EventHandler>)> = self
            .groups
            .borrow()
            .iter()
            .flat_map(|g| g.handlers.iter().map(|w| (g.name, w.clone())))
            .collect();

        for (name, weak) in snapshot {
            if event.is_handled() {
                break;
            }
            let Some(handler) = weak.upgrade() else {
                continue;
            };
            if !self.is_subscribed(&weak) {
                continue;
            }
            if let Err(err) = handler.handle(event).await {
                log::warn!("{name} failed to handle {:?}: {err:#}", event.kind());
            }
        }
        event.is_handled()
    }

    fn is_subscribed(&self, weak: &Weak<dyn EventHandler>) -> bool {
        let ptr = weak.as_ptr() as *const ();
        self.groups
            .borrow()
            .iter()
            .any(|g| g.handlers.iter().any(|w| same_handler(w, ptr)))
    }
}

fn prune(groups: &mut Vec<Group>) {
    for group in groups.iter_mut() {
        group.handlers.retain(|w| w.strong_count() > 0);
    }
    groups.retain(|g| !g.handlers.is_empty());
}
