use hashbrown::HashMap;

use crate::types::ItemId;

pub type PosIndex = HashMap<ItemId, usize>;
