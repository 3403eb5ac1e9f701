//! GradeSystem - 成绩评定与聚合引擎
//!
//! 学业测验管理系统的核心库：把原始分数录入转换为固定规则下的
//! 派生评定字段，以 (测验, 学生) 至多一条的约束持久化成绩记录，
//! 并在其上做多层级统计聚合。身份认证、授权、测验与学生的生命
//! 周期管理都属于调用方，引擎只通过窄接口读取它们的快照。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `grading`: 成绩计算（百分比/等级/通过判定的唯一出处）
//! - `models`: 数据模型定义
//! - `providers`: 外部协作方契约（测验/学生/科目快照）
//! - `runtime`: 引擎装配与日志初始化
//! - `services`: 业务逻辑层（批量提交、统计聚合）
//! - `storage`: 数据存储层（SeaORM / 内存）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod grading;
pub mod models;
pub mod providers;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
