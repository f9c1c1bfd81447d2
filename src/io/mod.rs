/*!
# IO utilities

Reading of extracted articles and writing of dataset splits, both in JSON Lines.
!*/
pub mod reader;
pub mod writer;
