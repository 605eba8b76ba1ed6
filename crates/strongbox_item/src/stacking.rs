use crate::ItemStack;

/// Decides how item stacks merge and split.
///
/// All amounts are `i32` so that intermediate arithmetic (sums of two stacks,
/// halving, deltas) never overflows the stack's own count type. Implementations
/// must be total: every method has to return a value for any amount in
/// `0..=max_size`.
pub trait StackingRule: Send + Sync {
    /// Whether the two stacks are of the same material and carry compatible
    /// data. Two empty stacks can be stacked.
    fn can_stack(&self, a: &ItemStack, b: &ItemStack) -> bool;

    /// Whether the two stacks can share a slot. An empty stack can share a
    /// slot with anything.
    fn can_be_stacked(&self, a: &ItemStack, b: &ItemStack) -> bool {
        a.is_empty() || b.is_empty() || self.can_stack(a, b)
    }

    /// The number of items in the stack. Empty stacks hold zero items.
    fn amount(&self, stack: &ItemStack) -> i32;

    /// The maximum amount a single slot can hold for this stack.
    fn max_size(&self, stack: &ItemStack) -> i32;

    /// Returns a copy of `stack` holding `amount` items. An amount of zero or
    /// less yields an empty stack.
    fn with_amount(&self, stack: &ItemStack, amount: i32) -> ItemStack;

    fn with_amount_delta(&self, stack: &ItemStack, f: &dyn Fn(i32) -> i32) -> ItemStack {
        self.with_amount(stack, f(self.amount(stack)))
    }
}

/// The vanilla stacking rule. Stacks merge when their material and data are
/// equal, and the max size comes from [`ItemKind::max_stack`].
///
/// [`ItemKind::max_stack`]: crate::ItemKind::max_stack
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultStackingRule;

impl StackingRule for DefaultStackingRule {
    fn can_stack(&self, a: &ItemStack, b: &ItemStack) -> bool {
        a.item() == b.item() && a.data() == b.data()
    }

    fn amount(&self, stack: &ItemStack) -> i32 {
        if stack.is_empty() {
            0
        } else {
            i32::from(stack.count())
        }
    }

    fn max_size(&self, stack: &ItemStack) -> i32 {
        i32::from(stack.item().max_stack())
    }

    fn with_amount(&self, stack: &ItemStack, amount: i32) -> ItemStack {
        let amount = amount.clamp(0, i32::from(ItemStack::STACK_MAX));
        // Lossless after the clamp above.
        stack.clone().with_count(amount as i8)
    }
}
