//! Action catalog
//!
//! The closed set of game actions that can invalidate cached API responses.
//! Each identifier has the form `"<domain>:<name>"` and is backed by a variant
//! of a per-domain enum, so internal callers get exhaustiveness checking while
//! external callers still go through a fallible string parse.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::RegistryError;

/// Declares a per-domain action enum with its identifier strings.
macro_rules! action_domain {
    (
        $(#[$meta:meta])*
        pub enum $enum_name:ident in $domain:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $name:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $enum_name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $enum_name {
            /// Every action of this domain, in catalog order
            pub const ALL: &'static [$enum_name] = &[$($enum_name::$variant),+];

            /// Name part of the identifier (after the `:`)
            pub const fn name(self) -> &'static str {
                match self {
                    $($enum_name::$variant => $name,)+
                }
            }

            /// Full `"<domain>:<name>"` identifier
            pub const fn id(self) -> &'static str {
                match self {
                    $($enum_name::$variant => concat!($domain, ":", $name),)+
                }
            }

            /// Look up an action by its name part
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some($enum_name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

mod actions;

pub use actions::{
    AdminAction, AnnouncementAction, AuthAction, CouponAction, DojoAction, EnhancementAction,
    EssenceTapAction, FishingAction, FortuneAction, GachaAction, ModalAction, PreAction,
    SecurityAction,
};

/// Feature area an action belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionDomain {
    Fishing,
    Dojo,
    Gacha,
    Admin,
    Auth,
    Coupon,
    Modal,
    Pre,
    Enhancement,
    Fortune,
    Announcement,
    EssenceTap,
}

impl ActionDomain {
    /// All domains in catalog order
    pub const ALL: [ActionDomain; 12] = [
        ActionDomain::Fishing,
        ActionDomain::Dojo,
        ActionDomain::Gacha,
        ActionDomain::Admin,
        ActionDomain::Auth,
        ActionDomain::Coupon,
        ActionDomain::Modal,
        ActionDomain::Pre,
        ActionDomain::Enhancement,
        ActionDomain::Fortune,
        ActionDomain::Announcement,
        ActionDomain::EssenceTap,
    ];

    /// Identifier prefix (before the `:`)
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionDomain::Fishing => "fishing",
            ActionDomain::Dojo => "dojo",
            ActionDomain::Gacha => "gacha",
            ActionDomain::Admin => "admin",
            ActionDomain::Auth => "auth",
            ActionDomain::Coupon => "coupon",
            ActionDomain::Modal => "modal",
            ActionDomain::Pre => "pre",
            ActionDomain::Enhancement => "enhancement",
            ActionDomain::Fortune => "fortune",
            ActionDomain::Announcement => "announcement",
            ActionDomain::EssenceTap => "essence_tap",
        }
    }

    /// Parse a domain prefix
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|domain| domain.as_str() == prefix)
    }

    /// Actions belonging to this domain, in catalog order
    pub fn actions(self) -> Vec<Action> {
        match self {
            ActionDomain::Fishing => FishingAction::ALL.iter().map(|a| Action::Fishing(*a)).collect(),
            ActionDomain::Dojo => DojoAction::ALL.iter().map(|a| Action::Dojo(*a)).collect(),
            ActionDomain::Gacha => GachaAction::ALL.iter().map(|a| Action::Gacha(*a)).collect(),
            ActionDomain::Admin => AdminAction::ALL
                .iter()
                .map(|a| Action::Admin(*a))
                .chain(SecurityAction::ALL.iter().map(|a| Action::Security(*a)))
                .collect(),
            ActionDomain::Auth => AuthAction::ALL.iter().map(|a| Action::Auth(*a)).collect(),
            ActionDomain::Coupon => CouponAction::ALL.iter().map(|a| Action::Coupon(*a)).collect(),
            ActionDomain::Modal => ModalAction::ALL.iter().map(|a| Action::Modal(*a)).collect(),
            ActionDomain::Pre => PreAction::ALL.iter().map(|a| Action::Pre(*a)).collect(),
            ActionDomain::Enhancement => EnhancementAction::ALL
                .iter()
                .map(|a| Action::Enhancement(*a))
                .collect(),
            ActionDomain::Fortune => FortuneAction::ALL.iter().map(|a| Action::Fortune(*a)).collect(),
            ActionDomain::Announcement => AnnouncementAction::ALL
                .iter()
                .map(|a| Action::Announcement(*a))
                .collect(),
            ActionDomain::EssenceTap => EssenceTapAction::ALL
                .iter()
                .map(|a| Action::EssenceTap(*a))
                .collect(),
        }
    }
}

impl fmt::Display for ActionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionDomain {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_prefix(s)
            .ok_or_else(|| RegistryError::invalid_configuration(format!("unknown action domain '{}'", s)))
    }
}

/// A catalog action
///
/// Admin actions are split into the general admin table and the security
/// table. Both share the `admin:` prefix; parsing consults the security table
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Fishing(FishingAction),
    Dojo(DojoAction),
    Gacha(GachaAction),
    Admin(AdminAction),
    Security(SecurityAction),
    Auth(AuthAction),
    Coupon(CouponAction),
    Modal(ModalAction),
    Pre(PreAction),
    Enhancement(EnhancementAction),
    Fortune(FortuneAction),
    Announcement(AnnouncementAction),
    EssenceTap(EssenceTapAction),
}

impl Action {
    /// Every catalog action, grouped by domain in catalog order
    pub fn all() -> Vec<Action> {
        ActionDomain::ALL
            .into_iter()
            .flat_map(ActionDomain::actions)
            .collect()
    }

    /// Full `"<domain>:<name>"` identifier
    pub const fn id(self) -> &'static str {
        match self {
            Action::Fishing(a) => a.id(),
            Action::Dojo(a) => a.id(),
            Action::Gacha(a) => a.id(),
            Action::Admin(a) => a.id(),
            Action::Security(a) => a.id(),
            Action::Auth(a) => a.id(),
            Action::Coupon(a) => a.id(),
            Action::Modal(a) => a.id(),
            Action::Pre(a) => a.id(),
            Action::Enhancement(a) => a.id(),
            Action::Fortune(a) => a.id(),
            Action::Announcement(a) => a.id(),
            Action::EssenceTap(a) => a.id(),
        }
    }

    /// Name part of the identifier
    pub const fn name(self) -> &'static str {
        match self {
            Action::Fishing(a) => a.name(),
            Action::Dojo(a) => a.name(),
            Action::Gacha(a) => a.name(),
            Action::Admin(a) => a.name(),
            Action::Security(a) => a.name(),
            Action::Auth(a) => a.name(),
            Action::Coupon(a) => a.name(),
            Action::Modal(a) => a.name(),
            Action::Pre(a) => a.name(),
            Action::Enhancement(a) => a.name(),
            Action::Fortune(a) => a.name(),
            Action::Announcement(a) => a.name(),
            Action::EssenceTap(a) => a.name(),
        }
    }

    pub const fn domain(self) -> ActionDomain {
        match self {
            Action::Fishing(_) => ActionDomain::Fishing,
            Action::Dojo(_) => ActionDomain::Dojo,
            Action::Gacha(_) => ActionDomain::Gacha,
            Action::Admin(_) | Action::Security(_) => ActionDomain::Admin,
            Action::Auth(_) => ActionDomain::Auth,
            Action::Coupon(_) => ActionDomain::Coupon,
            Action::Modal(_) => ActionDomain::Modal,
            Action::Pre(_) => ActionDomain::Pre,
            Action::Enhancement(_) => ActionDomain::Enhancement,
            Action::Fortune(_) => ActionDomain::Fortune,
            Action::Announcement(_) => ActionDomain::Announcement,
            Action::EssenceTap(_) => ActionDomain::EssenceTap,
        }
    }

    /// Resolve a name within a domain
    pub fn lookup(domain: ActionDomain, name: &str) -> Option<Action> {
        match domain {
            ActionDomain::Fishing => FishingAction::from_name(name).map(Action::Fishing),
            ActionDomain::Dojo => DojoAction::from_name(name).map(Action::Dojo),
            ActionDomain::Gacha => GachaAction::from_name(name).map(Action::Gacha),
            ActionDomain::Admin => SecurityAction::from_name(name)
                .map(Action::Security)
                .or_else(|| AdminAction::from_name(name).map(Action::Admin)),
            ActionDomain::Auth => AuthAction::from_name(name).map(Action::Auth),
            ActionDomain::Coupon => CouponAction::from_name(name).map(Action::Coupon),
            ActionDomain::Modal => ModalAction::from_name(name).map(Action::Modal),
            ActionDomain::Pre => PreAction::from_name(name).map(Action::Pre),
            ActionDomain::Enhancement => EnhancementAction::from_name(name).map(Action::Enhancement),
            ActionDomain::Fortune => FortuneAction::from_name(name).map(Action::Fortune),
            ActionDomain::Announcement => {
                AnnouncementAction::from_name(name).map(Action::Announcement)
            }
            ActionDomain::EssenceTap => EssenceTapAction::from_name(name).map(Action::EssenceTap),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Action {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_once(':')
            .and_then(|(prefix, name)| {
                ActionDomain::from_prefix(prefix).and_then(|domain| Action::lookup(domain, name))
            })
            .ok_or_else(|| RegistryError::unknown_action(s))
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
