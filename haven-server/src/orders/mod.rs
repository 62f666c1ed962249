//! 订单生命周期编排
//!
//! 下单主流程 (校验 → 令牌消费 → 支付状态判定 → 落库 → 确认邮件 →
//! 库存扣减) 以及各步骤的独立实现。
//!
//! 每一步独立提交，中途失败会留下不一致状态 (令牌已消费但订单未保存
//! 等)；副作用步骤 (邮件、库存) 的错误被吞掉，不影响主操作结果。

pub mod intake;
pub mod inventory;
pub mod payment;

pub use intake::place_order;
pub use inventory::adjust_inventory;
pub use payment::resolve_payment;
