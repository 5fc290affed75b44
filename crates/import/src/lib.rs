pub mod annotations;
pub mod results;

pub use annotations::{
    load_annotations, read_annotations, AnnotationError, LoadedAnnotations, ATTRIBUTES_COLUMN,
    SHAPE_COLUMN,
};
pub use results::{write_results, write_results_to, ResultsError, OUTPUT_HEADER};
