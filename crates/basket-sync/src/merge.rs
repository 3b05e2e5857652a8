//! # Guest/Remote Cart Merge
//!
//! The one-shot merge performed on `Guest → Authenticated`.
//!
//! ## Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Merge by Line Key                                │
//! │                                                                         │
//! │  local only  ──────────────────────► kept as-is                        │
//! │  remote only ──────────────────────► appended after local lines        │
//! │  both sides  ──────────────────────► quantities SUMMED (capped),       │
//! │                                      price/display fields from the     │
//! │                                      side with the fresher added_at    │
//! │                                                                         │
//! │  Local insertion order is preserved; remote-only lines keep the        │
//! │  remote's relative order at the tail.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Sum quantities, take the freshest captured price" is the recorded
//! product decision for conflicting lines; the whole policy lives in this
//! one pure function so it is trivial to revisit.

use basket_core::types::{Cart, CartLine};
use basket_core::MAX_LINE_QUANTITY;

/// Merges a guest (local) cart with the fetched remote cart.
///
/// Pure: both inputs are consumed, the merged cart is returned. The
/// caller persists the result locally and pushes it to the remote.
pub fn merge_carts(local: Cart, remote: Cart) -> Cart {
    let mut merged = Cart::new();
    merged.created_at = local.created_at.min(remote.created_at);

    let mut remote_lines: Vec<Option<CartLine>> = remote.lines.into_iter().map(Some).collect();

    for local_line in local.lines {
        let conflict = remote_lines
            .iter_mut()
            .find(|slot| {
                slot.as_ref()
                    .map(|r| r.matches(&local_line.key()))
                    .unwrap_or(false)
            })
            .and_then(Option::take);

        match conflict {
            Some(remote_line) => merged.lines.push(resolve(local_line, remote_line)),
            None => merged.lines.push(local_line),
        }
    }

    // Remote-only lines, in the remote's order.
    merged.lines.extend(remote_lines.into_iter().flatten());

    merged
}

/// Resolves one conflicting line pair: summed quantity, fresher capture.
fn resolve(local: CartLine, remote: CartLine) -> CartLine {
    let quantity = (local.quantity + remote.quantity).min(MAX_LINE_QUANTITY);

    let mut winner = if remote.added_at > local.added_at {
        remote
    } else {
        local
    };
    winner.quantity = quantity;
    winner
}

// =============================================================================
// Unit Tests
// =============================================================================
