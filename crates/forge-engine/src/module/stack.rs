use std::cell::RefCell;
use std::rc::Rc;

use super::{DrawCtx, UpdateCtx};

/// Capability interface for anything driven by the frame loop.
///
/// Callbacks take `&self`: a module is shared between the stack and, when
/// it handles events, the dispatcher. Keep mutable state behind `Cell` /
/// `RefCell`.
pub trait Module {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn update(&self, _ctx: &mut UpdateCtx<'_>) {}

    fn draw(&self, _ctx: &mut DrawCtx<'_, '_>) {}

    /// Surface resized, in physical pixels.
    fn resize(&self, _width: u32, _height: u32) {}
}

/// Ordered module list.
///
/// Every pass iterates a snapshot taken at its start. A module removed
/// during the pass is skipped if it has not run yet; a module added during
/// the pass first runs on the next one. No module is ever invoked twice in
/// one pass.
#[derive(Default)]
pub struct ModuleStack {
    modules: RefCell<Vec<Rc<dyn Module>>>,
}

impl ModuleStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `module`. Adding an instance that is already present is a
    /// no-op and returns false.
    pub fn add(&self, module: Rc<dyn Module>) -> bool {
        if self.contains(&module) {
            return false;
        }
        log::debug!("module added: {}", module.name());
        self.modules.borrow_mut().push(module);
        true
    }

    /// Removes `module` by identity. Returns false if it was not present.
    pub fn remove<M: Module + ?Sized>(&self, module: &Rc<M>) -> bool {
        let ptr = Rc::as_ptr(module) as *const ();
        let mut modules = self.modules.borrow_mut();
        let Some(pos) = modules
            .iter()
            .position(|m| std::ptr::addr_eq(Rc::as_ptr(m), ptr))
        else {
            return false;
        };
        let removed = modules.remove(pos);
        log::debug!("module removed: {}", removed.name());
        true
    }

    pub fn contains<M: Module + ?Sized>(&self, module: &Rc<M>) -> bool {
        let ptr = Rc::as_ptr(module) as *const ();
        self.contains_ptr(ptr)
    }

    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.borrow().is_empty()
    }

    /// Calls every module's `update` once, in insertion order.
    pub fn update_all(&self, ctx: &mut UpdateCtx<'_>) {
        for module in self.snapshot() {
            if self.contains(&module) {
                module.update(ctx);
            }
        }
    }

    pub fn draw_all(&self, ctx: &mut DrawCtx<'_, '_>) {
        for module in self.snapshot() {
            if self.contains(&module) {
                module.draw(ctx);
            }
        }
    }

    pub fn resize_all(&self, width: u32, height: u32) {
        for module in self.snapshot() {
            if self.contains(&module) {
                module.resize(width, height);
            }
        }
    }

    fn snapshot(&self) -> Vec<Rc<dyn Module>> {
        self.modules.borrow().clone()
    }

    fn contains_ptr(&self, ptr: *const ()) -> bool {
        self.modules
            .borrow()
            .iter()
            .any(|m| std::ptr::addr_eq(Rc::as_ptr(m), ptr))
    }
}
