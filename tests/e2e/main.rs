//! End-to-end journal scenarios against real journal files.

mod scenarios;
