//! Authority port - 「caller はこの principal の権限を持つか？」
//!
//! 署名やセッションの検証はホストの仕事。Registry は結果だけを
//! 純粋な述語として受け取る。
//!
//! # 実装
//! - **OwnerAuthority**: 本人のみ（デフォルト）
//! - **DelegatedAuthority**: 本人 + 登録済みの代理人

use std::collections::{HashMap, HashSet};

use crate::domain::UserId;

/// Authority は update / schedule の認可判定
pub trait Authority: Send + Sync {
    /// `caller` が `target` として操作できるなら `true`
    fn permits(&self, caller: &UserId, target: &UserId) -> bool;
}

/// principal 本人だけが権限を持つ
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerAuthority;

impl Authority for OwnerAuthority {
    fn permits(&self, caller: &UserId, target: &UserId) -> bool {
        caller == target
    }
}

/// 本人 + 明示的に grant された代理人
#[derive(Debug, Clone, Default)]
pub struct DelegatedAuthority {
    /// principal -> callers allowed to act for it
    delegates: HashMap<UserId, HashSet<UserId>>,
}

impl DelegatedAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `delegate` act on behalf of `principal`.
    pub fn grant(mut self, principal: UserId, delegate: UserId) -> Self {
        self.delegates.entry(principal).or_default().insert(delegate);
        self
    }

    pub fn revoke(&mut self, principal: &UserId, delegate: &UserId) {
        if let Some(set) = self.delegates.get_mut(principal) {
            set.remove(delegate);
            if set.is_empty() {
                self.delegates.remove(principal);
            }
        }
    }
}

impl Authority for DelegatedAuthority {
    fn permits(&self, caller: &UserId, target: &UserId) -> bool {
        caller == target
            || self
                .delegates
                .get(target)
                .is_some_and(|set| set.contains(caller))
    }
}
