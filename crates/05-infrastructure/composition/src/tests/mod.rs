//! 容器启动器测试
