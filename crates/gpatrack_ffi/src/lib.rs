//! Flutter bridge surface for the GPA tracker core.
//! Only `api` is exposed to codegen; everything else stays in core.

pub mod api;
