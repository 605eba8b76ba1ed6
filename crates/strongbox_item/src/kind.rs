/// The material of an item stack.
///
/// Only the items the inventory logic needs to reason about are listed here.
/// Anything else can be modelled with one of the plain materials, since the
/// click machinery only cares about stack limits and equipment placement.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub enum ItemKind {
    #[default]
    Air,
    Stone,
    Cobblestone,
    Dirt,
    Sand,
    OakLog,
    OakPlanks,
    Stick,
    Coal,
    IronIngot,
    GoldIngot,
    Diamond,
    Apple,
    Bread,
    Arrow,
    Egg,
    Snowball,
    EnderPearl,
    Bucket,
    WaterBucket,
    GlassBottle,
    Potion,
    BlazePowder,
    NetherWart,
    Bow,
    IronSword,
    DiamondPickaxe,
    Shield,
    CarvedPumpkin,
    LeatherHelmet,
    LeatherChestplate,
    LeatherLeggings,
    LeatherBoots,
    IronHelmet,
    IronChestplate,
    IronLeggings,
    IronBoots,
    DiamondHelmet,
    DiamondChestplate,
    DiamondLeggings,
    DiamondBoots,
    Elytra,
}

impl ItemKind {
    /// The maximum number of items of this kind a single slot can hold.
    pub const fn max_stack(self) -> i8 {
        match self {
            ItemKind::Egg
            | ItemKind::Snowball
            | ItemKind::EnderPearl
            | ItemKind::Bucket => 16,
            ItemKind::WaterBucket
            | ItemKind::Potion
            | ItemKind::Bow
            | ItemKind::IronSword
            | ItemKind::DiamondPickaxe
            | ItemKind::Shield
            | ItemKind::LeatherHelmet
            | ItemKind::LeatherChestplate
            | ItemKind::LeatherLeggings
            | ItemKind::LeatherBoots
            | ItemKind::IronHelmet
            | ItemKind::IronChestplate
            | ItemKind::IronLeggings
            | ItemKind::IronBoots
            | ItemKind::DiamondHelmet
            | ItemKind::DiamondChestplate
            | ItemKind::DiamondLeggings
            | ItemKind::DiamondBoots
            | ItemKind::Elytra => 1,
            _ => 64,
        }
    }

    /// The equipment slot this item is placed in when it is moved with a
    /// shift click, if any.
    pub const fn equipment_slot(self) -> Option<EquipmentSlot> {
        match self {
            ItemKind::CarvedPumpkin
            | ItemKind::LeatherHelmet
            | ItemKind::IronHelmet
            | ItemKind::DiamondHelmet => Some(EquipmentSlot::Head),
            ItemKind::LeatherChestplate
            | ItemKind::IronChestplate
            | ItemKind::DiamondChestplate
            | ItemKind::Elytra => Some(EquipmentSlot::Chest),
            ItemKind::LeatherLeggings | ItemKind::IronLeggings | ItemKind::DiamondLeggings => {
                Some(EquipmentSlot::Legs)
            }
            ItemKind::LeatherBoots | ItemKind::IronBoots | ItemKind::DiamondBoots => {
                Some(EquipmentSlot::Feet)
            }
            ItemKind::Shield => Some(EquipmentSlot::OffHand),
            _ => None,
        }
    }
}

/// A place on a living entity where an item can be worn or held.
///
/// The discriminants match the equipment indices used on the wire.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum EquipmentSlot {
    MainHand = 0,
    OffHand = 1,
    Feet = 2,
    Legs = 3,
    Chest = 4,
    Head = 5,
}

impl EquipmentSlot {
    pub const fn is_armor(self) -> bool {
        matches!(
            self,
            EquipmentSlot::Feet | EquipmentSlot::Legs | EquipmentSlot::Chest | EquipmentSlot::Head
        )
    }

    pub const fn is_hand(self) -> bool {
        !self.is_armor()
    }
}
