pub struct Unfinished {
    pub field: String
