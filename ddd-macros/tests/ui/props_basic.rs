use ddd_kernel::{Entity, Props, ValueObject};

#[derive(Debug, Clone, PartialEq, Props)]
pub struct UserProps {
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Props)]
struct Point {
    x: i64,
    y: i64,
}

fn main() {
    assert_eq!(<UserProps as Props>::KIND, "User");
    assert_eq!(<Point as Props>::KIND, "Point");
    assert_eq!(UserProps::AGE.name(), "age");

    let mut user = Entity::create(UserProps {
        name: "Jane".into(),
        age: 21,
    })
    .unwrap();
    user.change(UserProps::AGE, 30);
    assert_eq!(*user.get(UserProps::AGE), 30);

    let point = ValueObject::create(Point { x: 1, y: 2 }).unwrap();
    assert_eq!(*point.get(Point::Y), 2);
    assert_eq!(point.hash_code(), "[ValueObject@Point]");
}
