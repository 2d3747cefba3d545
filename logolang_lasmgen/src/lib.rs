//! LASM text generation.
//!
//! The emitted dialect is the LogoVM contract. A program is a sequence of
//! directives (`.START`, `.INIT`, `.DATA`, `.CODE`), label definitions
//! (`NAME:` at column zero) and instructions (two-space indented):
//!
//! - stack: `PUSH v` (a numeric literal or a `"word`), `DUP`, `POP`, `DEC`
//! - memory: `LOAD name`, `STOR name` — a bare global (`X`) or a
//!   procedure-qualified parameter slot (`SQUARE.SIDE`)
//! - arithmetic: `ADD`, `SUB`, `MUL`, `DIV`
//! - comparison: `EQ`, `LT`, `GT` — pop two operands, push 1 or 0
//! - control: `JMP label`, `JZ label` (pop, jump if zero),
//!   `CALL label argc`, `RET`, `HALT`
//! - drawing and output: `FWD`, `BCK`, `ROTR`, `ROTL`, `PENUP`, `PENDN`,
//!   `MVTO`, `CLRSCR`, `WRITE`
//!
//! Callers push arguments left to right; the callee prologue binds them to
//! parameter slots by storing in reverse declaration order. Synthesized jump
//! targets are `_L0`, `_L1`, … in emission order — the underscore keeps them
//! outside the user-identifier space, as is the `__main__` entry label.

mod gen;

pub use gen::generate;
