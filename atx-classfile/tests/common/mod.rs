use atx_classfile::{AccessFlags, ClassFileBuilder, FieldConstant};

/// A class exercising every structure the skeleton decoder walks.
pub fn sample_class() -> Vec<u8> {
    ClassFileBuilder::new("com/example/Outer", AccessFlags::PUBLIC | AccessFlags::SUPER)
        .interface("java/lang/Runnable")
        .constant_field(
            AccessFlags::PRIVATE | AccessFlags::STATIC | AccessFlags::FINAL,
            "SERIAL",
            "J",
            FieldConstant::Long(42),
        )
        .field(AccessFlags::PRIVATE, "count", "I")
        .method(AccessFlags::PUBLIC, "<init>", "()V", Some(&[0x2a, 0xb1]))
        .method(AccessFlags::PRIVATE, "run", "()V", Some(&[0xb1]))
        .method(AccessFlags::PUBLIC | AccessFlags::ABSTRACT, "tick", "(I)Z", None)
        .inner_class(
            "com/example/Outer$Inner",
            Some("com/example/Outer"),
            Some("Inner"),
            AccessFlags::PRIVATE | AccessFlags::STATIC,
        )
        .inner_class("com/example/Outer$1", None, None, AccessFlags::empty())
        .source_file("Outer.java")
        .build()
}
