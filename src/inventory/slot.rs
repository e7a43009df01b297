use crate::data::schema::Item;

/// 背包里的一格：空格子 item 为 None 且 quantity 为 0
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InventorySlot {
    item: Option<Item>,
    quantity: u32,
}

impl InventorySlot {
    pub fn new(item: Item, quantity: u32) -> Self {
        if quantity == 0 {
            return Self::default();
        }
        Self {
            item: Some(item),
            quantity,
        }
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    /// 有物品且未达堆叠上限
    pub fn has_room(&self) -> bool {
        self.item
            .as_ref()
            .is_some_and(|item| self.quantity < item.max_stack())
    }

    /// 空格子，或同种物品且还没堆满
    pub fn can_accept(&self, item: &Item) -> bool {
        match &self.item {
            None => true,
            Some(current) => current == item && self.quantity < item.max_stack(),
        }
    }

    /// 不检查堆叠上限，由调用方保证
    pub fn add(&mut self, count: u32) {
        self.quantity = self.quantity.saturating_add(count);
    }

    /// 数量减到 0 时清空格子
    pub fn remove(&mut self, count: u32) {
        if count >= self.quantity {
            self.clear();
        } else {
            self.quantity -= count;
        }
    }

    pub fn clear(&mut self) {
        self.item = None;
        self.quantity = 0;
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        if quantity == 0 {
            self.clear();
        } else {
            self.quantity = quantity;
        }
    }
}
