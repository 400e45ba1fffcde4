//! 이성분계 증류 계산 모듈 모음.
//! 평형 관계, q-선, 조작선, McCabe-Thiele 단 계산으로 구성한다.

pub mod equilibrium;
pub mod feed_line;
pub mod mccabe_thiele;
pub mod operating_line;
pub mod roots;

pub use equilibrium::*;
pub use feed_line::*;
pub use mccabe_thiele::*;
pub use operating_line::*;
