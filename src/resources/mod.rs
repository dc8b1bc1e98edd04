//! 资源模块
//!
//! 纹理的加载与解码由宿主的资源子系统负责；本模块只定义粒子引擎查询纹理状态的接口，
//! 以及一个可供宿主和测试直接使用的内存纹理表。

pub mod texture;

pub use texture::{LoadState, TextureHandle, TextureSource, TextureTable};
