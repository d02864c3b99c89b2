#![forbid(unsafe_code)]

//! Init-once bookkeeping for page modules.
//!
//! Each behaviour module owns one bit in a [`ModuleSet`]. The coordinator
//! holds a single [`Lifecycle`] and asks it before every `init`: the first
//! request for a module flips its bit and returns `true`, every later request
//! returns `false`. Bits are never cleared; the set lives exactly as long as
//! the page.
//!
//! A module whose document anchors are missing still has its bit set. It is
//! recorded as skipped and is not retried on later `init` calls.

use std::fmt;

use bitflags::bitflags;

/// Page behaviour modules, in bootstrap order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleId {
    NavToggle,
    Anchors,
    ActiveMenu,
    ScrollSpy,
    Images,
    Forms,
    Accordion,
    ScrollToTop,
    PrivacyLinks,
}

impl ModuleId {
    /// Every module in the order the bootstrapper initialises them.
    pub const ALL: [Self; 9] = [
        Self::NavToggle,
        Self::Anchors,
        Self::ActiveMenu,
        Self::ScrollSpy,
        Self::Images,
        Self::Forms,
        Self::Accordion,
        Self::ScrollToTop,
        Self::PrivacyLinks,
    ];

    /// Bit owned by this module.
    #[must_use]
    pub const fn flag(self) -> ModuleSet {
        match self {
            Self::NavToggle => ModuleSet::NAV_TOGGLE,
            Self::Anchors => ModuleSet::ANCHORS,
            Self::ActiveMenu => ModuleSet::ACTIVE_MENU,
            Self::ScrollSpy => ModuleSet::SCROLL_SPY,
            Self::Images => ModuleSet::IMAGES,
            Self::Forms => ModuleSet::FORMS,
            Self::Accordion => ModuleSet::ACCORDION,
            Self::ScrollToTop => ModuleSet::SCROLL_TO_TOP,
            Self::PrivacyLinks => ModuleSet::PRIVACY_LINKS,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NavToggle => "nav-toggle",
            Self::Anchors => "anchors",
            Self::ActiveMenu => "active-menu",
            Self::ScrollSpy => "scroll-spy",
            Self::Images => "images",
            Self::Forms => "forms",
            Self::Accordion => "accordion",
            Self::ScrollToTop => "scroll-to-top",
            Self::PrivacyLinks => "privacy-links",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of modules that have been initialised.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModuleSet: u16 {
        const NAV_TOGGLE    = 1 << 0;
        const ANCHORS       = 1 << 1;
        const ACTIVE_MENU   = 1 << 2;
        const SCROLL_SPY    = 1 << 3;
        const IMAGES        = 1 << 4;
        const FORMS         = 1 << 5;
        const ACCORDION     = 1 << 6;
        const SCROLL_TO_TOP = 1 << 7;
        const PRIVACY_LINKS = 1 << 8;
    }
}

/// Page-scoped init guard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    initialized: ModuleSet,
}

impl Lifecycle {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initialized: ModuleSet::empty(),
        }
    }

    /// Claim the first initialisation of `module`.
    ///
    /// Returns `true` exactly once per module.
    pub fn begin(&mut self, module: ModuleId) -> bool {
        let flag = module.flag();
        if self.initialized.contains(flag) {
            tracing::trace!(module = module.name(), "init skipped: already initialized");
            return false;
        }
        self.initialized.insert(flag);
        true
    }

    #[must_use]
    pub const fn is_initialized(&self, module: ModuleId) -> bool {
        self.initialized.contains(module.flag())
    }

    #[must_use]
    pub const fn initialized(&self) -> ModuleSet {
        self.initialized
    }
}
