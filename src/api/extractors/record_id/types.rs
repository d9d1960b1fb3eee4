/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *  - 以下に pub で列挙するものは ./mod.rs 経由で全て公開される
 */
use super::core::RecordId;

// expenses
pub enum ExpenseTag {}
pub type ExpenseId = RecordId<ExpenseTag>;
