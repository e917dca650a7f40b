pub mod d100_satisfaction;
