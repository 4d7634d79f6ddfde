use crate::util::Address;

/// Page ownership queries. The binding implements this with its page table.
///
/// Both methods are called on barrier slow paths and while marking, so they must not block,
/// allocate, or take locks.
pub trait PageTable {
    /// Is the address on a page managed by the collector? Addresses that are not (e.g. static
    /// data emitted by the compiler) are never marked.
    fn is_managed_page(addr: Address) -> bool;

    /// Is the address on a page owned by the calling thread? We only use this to check
    /// invariants: a newly marked object must be on a page that the marking thread owns.
    fn is_owned_page(addr: Address) -> bool;
}
